/// A user intent, decoupled from the raw terminal event that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    /// Periodic timer tick; drives spinners and progress polling.
    Tick,
    Quit,
    MoveUp,
    MoveDown,
    /// Enter: confirm the current selection or input.
    Select,
    /// Esc / b: back out of the current screen.
    Back,
    /// o: open the current profile's links in the browser.
    OpenTabs,
    /// f: fetch fresh links from the profile's providers.
    Fetch,
    /// v: validate the current profile's links.
    Validate,
    /// p: switch profile.
    SwitchProfile,
    /// c: cancel a running validation.
    Cancel,
    /// Digit typed into a numeric settings field.
    Digit(char),
    Backspace,
    ToggleHelp,
    Resize(u16, u16),
}
