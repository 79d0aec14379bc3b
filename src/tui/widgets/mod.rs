//! One file per dashboard panel. Every widget is a free `render` taking the
//! frame, its area and the app state, so `ui::draw` stays a layout table.

pub mod feed;
pub mod header;
pub mod history;
pub mod journal;
pub mod miners;
pub mod totals;
