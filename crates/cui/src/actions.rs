use crate::app::App;
use crate::input::InputAction;

pub fn dispatch(app: &mut App, action: InputAction) {
    if app.notice.is_some() && action != InputAction::Quit {
        app.notice = None;
        return;
    }
    match action {
        InputAction::None => {}
        InputAction::Quit => app.should_quit = true,
        InputAction::ToggleHelp => app.show_help = !app.show_help,
        InputAction::Dismiss => app.show_help = false,
        InputAction::Pull => app.pull(),
        InputAction::NextFilter => app.cycle_filter(true),
        InputAction::PrevFilter => app.cycle_filter(false),
        InputAction::ResetHistory => app.reset_history(),
    }
}
