use crate::ui::tui;

/// Gives the terminal back before the report is printed, otherwise the
/// panic message lands in the alternate screen.
pub fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        if crossterm::terminal::is_raw_mode_enabled().unwrap_or(false) {
            let _ = tui::Tui::restore();
        }
        tracing::error!("{panic_info}");
        hook(panic_info);
    }));
}
