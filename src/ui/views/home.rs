use std::fmt;

use crate::ui::router::Route;

/// One operation button of the menu: a label and the page it opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub title: &'static str,
    pub route: Route,
}

/// Static landing pages. Both list the demo pages; only the heading differs.
#[derive(Debug, Clone)]
pub struct HomeView {
    heading: &'static str,
    entries: Vec<MenuEntry>,
}

impl HomeView {
    pub fn for_route(route: Route) -> Self {
        let entries = [Route::BehaviorSubject, Route::ForkJoin]
            .into_iter()
            .map(|route| MenuEntry {
                title: route.title(),
                route,
            })
            .collect();
        Self {
            heading: route.title(),
            entries,
        }
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for HomeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.heading)?;
        for entry in &self.entries {
            writeln!(f, "  [{}] {}", entry.route, entry.title)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_lists_demo_pages() {
        let view = HomeView::for_route(Route::Menu);

        assert_eq!(
            view.render(),
            concat!(
                "Operations\n",
                "  [/behavorsubject] Product list\n",
                "  [/forkjoin] Products, categories and users\n"
            )
        );
        assert_eq!(view.entries().len(), 2);
    }

    #[test]
    fn test_home_heading() {
        assert!(HomeView::for_route(Route::Home).render().starts_with("Home\n"));
    }
}
