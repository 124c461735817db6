use app::Application;

/// AR placement demo application.
///
/// Marker type carrying the application's identity for `AppBuilder`.
pub struct ArDemo;

impl Application for ArDemo {
    const APP_ID: &'static str = "ar_demo";
}
