use crate::app::dashboard::PageView;
use crate::utils::error::Result;
use handlebars::Handlebars;

const PAGE_TEMPLATE: &str = include_str!("templates/page.hbs");
const GUIDE_PARTIAL: &str = include_str!("templates/guide.hbs");
const TABLE_PARTIAL: &str = include_str!("templates/table.hbs");

/// Handlebars registry with the page template and its partials compiled in.
pub struct PageRenderer {
    registry: Handlebars<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_partial("guide", GUIDE_PARTIAL)?;
        registry.register_partial("table", TABLE_PARTIAL)?;
        registry.register_template_string("page", PAGE_TEMPLATE)?;
        Ok(Self { registry })
    }

    pub fn render(&self, page: &PageView) -> Result<String> {
        Ok(self.registry.render("page", page)?)
    }
}
