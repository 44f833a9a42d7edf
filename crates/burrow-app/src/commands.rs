use burrow_browser::Renderer;
use burrow_terminal::CommandOutput;

/// Show the result of one command line. Returns `false` when the session
/// should end.
pub fn process_command_output(
    result: burrow_types::Result<CommandOutput>,
    renderer: &mut dyn Renderer,
) -> bool {
    match result {
        Ok(CommandOutput::Text(text)) => {
            for l in text.lines() {
                renderer.notify(l);
            }
            true
        },
        Ok(CommandOutput::None) => true,
        Ok(CommandOutput::Quit) => false,
        Err(e) => {
            log::debug!("command failed: {e:?}");
            renderer.notify(&format!("error: {e}"));
            true
        },
    }
}
