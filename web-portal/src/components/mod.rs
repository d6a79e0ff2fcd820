mod base;
mod dashboard;
mod kanban;
mod login;
mod nav;
mod profile;

use leptos::*;
use strum::IntoEnumIterator;

pub use base::BasePage;
pub use dashboard::Dashboard;
pub use kanban::{Kanban, TemperatureBadge};
pub use login::{Login, LoginFeedback, LoginMode};
pub use nav::{Nav, Page};
pub use profile::Profile;

/// `<option>` elements for every variant of `E`, marking the `selected` variant
fn enum_options<E>(cx: Scope, selected: Option<E>) -> Vec<View>
where
    E: IntoEnumIterator + Into<&'static str> + PartialEq + Copy,
{
    E::iter()
        .map(|variant| {
            let is_selected = selected == Some(variant);
            let value: &'static str = variant.into();
            view! { cx, <option value=value selected=is_selected>{value}</option> }.into_view(cx)
        })
        .collect()
}
