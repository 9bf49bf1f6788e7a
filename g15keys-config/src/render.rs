//! Renders resolved actions back into descriptor strings

use g15keys_core::{Action, Configuration, InputToken};

use crate::error::{ConfigFileError, Result};

/// Descriptor strings for an action list.
///
/// Consecutive input tokens are folded into one `emit` descriptor. Mode
/// switches need `config` to turn their target back into a name.
pub fn describe_actions(
    actions: &[Action],
    config: Option<&Configuration>,
) -> Result<Vec<String>> {
    let mut out = Vec::new();
    let mut pending: Vec<InputToken> = Vec::new();

    for action in actions {
        if let Action::EmitInput(token) = action {
            pending.push(*token);
            continue;
        }
        flush_tokens(&mut pending, &mut out);

        let text = match action {
            Action::RunProgram { path, args } => {
                let program = path.to_string_lossy();
                let words = std::iter::once(program.as_ref()).chain(args.iter().map(String::as_str));
                shell_words::join(words)
            }
            Action::SwitchMode(target) => {
                let name = config
                    .map(|config| config.mode_name(*target))
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| {
                        ConfigFileError::document(
                            "action list",
                            "mode switch without a profile name",
                        )
                    })?;
                format!("switch-profile {name}")
            }
            Action::StartRecording => "record".to_string(),
            Action::SetLeds(mask) if mask.is_empty() => "set-leds".to_string(),
            Action::SetLeds(mask) => format!("set-leds {mask}"),
            Action::EmitInput(_) => continue,
        };
        out.push(text);
    }
    flush_tokens(&mut pending, &mut out);

    Ok(out)
}

fn flush_tokens(pending: &mut Vec<InputToken>, out: &mut Vec<String>) {
    if pending.is_empty() {
        return;
    }
    let list: Vec<String> = pending.drain(..).map(|token| token.to_string()).collect();
    out.push(format!("emit {}", list.join(",")));
}
