// Client-side controllers for the instance list and detail pages.
//
// Views talk to the console API through `client::DashboardApi` and expose a plain
// model snapshot for rendering.

pub mod client;
pub mod config;
pub mod detail_view;
pub mod labels;
pub mod list_view;
pub mod view;

pub use client::{ApiFailure, DashboardApi, HttpDashboardApi};
pub use config::DashboardConfig;
pub use detail_view::{DetailView, DetailViewModel};
pub use list_view::{ListView, ListViewModel};
pub use view::{LoadState, Notice, ViewError};
