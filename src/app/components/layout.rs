//! Page layouts: public pages and the admin back-office.

use dioxus::prelude::*;

use super::nav::{AdminNav, PublicNav};

const STYLESHEET: Asset = asset!("/public/riad.css");

#[derive(Props, Clone, PartialEq)]
pub struct LayoutProps {
    /// Page title (shown in browser tab)
    pub title: String,
    /// Active navigation item ID
    #[props(default)]
    pub nav_active: String,
    /// Page content
    pub children: Element,
}

/// Layout for public and customer pages.
#[component]
pub fn Layout(props: LayoutProps) -> Element {
    let version = env!("RIAD_VERSION");
    let full_title = format!("{} - Riad Booking", props.title);

    rsx! {
        document::Title { "{full_title}" }
        document::Link { rel: "stylesheet", href: STYLESHEET }

        PublicNav { active: props.nav_active.clone() }
        main { {props.children} }
        footer { style: "text-align:center; padding:.75rem 0;",
            small { class: "text-muted", "Riad Booking v{version}" }
        }
    }
}

/// Layout for admin pages, with the back-office navbar.
#[component]
pub fn AdminLayout(props: LayoutProps) -> Element {
    let full_title = format!("{} - Riad Admin", props.title);

    rsx! {
        document::Title { "{full_title}" }
        document::Link { rel: "stylesheet", href: STYLESHEET }

        AdminNav { active: props.nav_active.clone() }
        main { {props.children} }
    }
}
