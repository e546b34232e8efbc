use crate::utils::error::{AppError, AppResult};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal,
};
use std::io::{self, Write};
use std::path::Path;
use std::process::Command;

pub fn prompt_input(prompt: &str) -> AppResult<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_string())
}

/// Ask until a non-empty answer is given; `None` on end of input
pub fn prompt_required(prompt: &str) -> AppResult<Option<String>> {
    loop {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(None);
        }
        let answer = input.trim();
        if !answer.is_empty() {
            return Ok(Some(answer.to_string()));
        }
    }
}

/// Read a password without echoing it. `None` when the user presses Esc.
pub fn prompt_secret(prompt: &str) -> AppResult<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    terminal::enable_raw_mode()?;
    let result = read_secret();
    terminal::disable_raw_mode()?;
    print!("\r\n");
    io::stdout().flush()?;

    result
}

fn read_secret() -> AppResult<Option<String>> {
    let mut secret = String::new();
    loop {
        if let Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) = event::read()?
        {
            if kind == KeyEventKind::Release {
                continue;
            }
            match code {
                KeyCode::Enter => return Ok(Some(secret)),
                KeyCode::Esc => return Ok(None),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(None);
                }
                KeyCode::Backspace => {
                    if secret.pop().is_some() {
                        print!("\x08 \x08");
                        io::stdout().flush()?;
                    }
                }
                KeyCode::Char(c) => {
                    secret.push(c);
                    print!("*");
                    io::stdout().flush()?;
                }
                _ => {}
            }
        }
    }
}

pub fn prompt_yes_no(prompt: &str) -> AppResult<bool> {
    loop {
        let input = prompt_input(&format!("{} [y/N]: ", prompt))?;
        match input.to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" | "" => return Ok(false),
            _ => println!("Please enter 'y' or 'n'"),
        }
    }
}

/// Pick an editor: explicit choice, then $EDITOR, then whatever is installed
pub fn detect_editor(preferred: Option<&str>) -> String {
    preferred
        .map(|s| s.to_string())
        .or_else(|| std::env::var("EDITOR").ok().filter(|e| !e.is_empty()))
        .unwrap_or_else(|| {
            if cfg!(windows) {
                "notepad".to_string()
            } else if Path::new("/usr/bin/nvim").exists() {
                "nvim".to_string()
            } else if Path::new("/usr/bin/vim").exists() {
                "vim".to_string()
            } else if Path::new("/usr/bin/nano").exists() {
                "nano".to_string()
            } else {
                "vi".to_string()
            }
        })
}

/// Open a file in the configured editor and wait for it to close
pub fn edit_file_direct(file_path: &Path, editor_cmd: Option<&str>) -> AppResult<()> {
    let editor = detect_editor(editor_cmd);
    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| AppError::System("Editor command is empty".to_string()))?;

    let status = Command::new(program)
        .args(parts)
        .arg(file_path)
        .status()
        .map_err(|e| AppError::System(format!("Failed to execute editor {}: {}", editor, e)))?;

    if !status.success() {
        return Err(AppError::System("Editor exited with non-zero status".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_editor_prefers_explicit_choice() {
        assert_eq!(detect_editor(Some("micro")), "micro");
        assert!(!detect_editor(None).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_edit_file_direct_reports_failure() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        assert!(edit_file_direct(tmp.path(), Some("true")).is_ok());
        assert!(matches!(
            edit_file_direct(tmp.path(), Some("false")),
            Err(AppError::System(_))
        ));
    }
}
