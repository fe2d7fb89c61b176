//! Line-driven interactive session.
//!
//! Each input line is one user action. Statuses go to the output stream,
//! one per line, so a session can be scripted through stdin.

use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::Result;
use bodymap_core::{Action, AnnotationPersistence, Controller, Diagram, Isolation, Layer};
use tracing::debug;

use super::list::write_rows;
use super::open_controller;
use super::render::{render, write_output, OutputFormat};
use crate::config::Config;

const HELP: &str = "\
Befehle:
  click <region-id>        Region auswählen
  voice <text>             Freitext auflösen (z.B. voice Brachialis rechts Schmerz 6/10)
  example                  Beispielbefehl ausführen
  find <suchbegriff>       Region suchen
  note <text>              Notiz setzen (leer = Notiz löschen)
  save                     Markierung speichern
  delete                   Markierung der Auswahl löschen
  clear                    Auswahl aufheben
  session <1-6>            Session wechseln
  intensity <1-10>         Intensität setzen
  layer <name> on|off      Ebene ein-/ausblenden
  isolate <mix|layer>      Ebene isolieren
  reset                    Ansicht zurücksetzen
  list                     Markierungen der Session
  render [datei]           SVG ausgeben oder schreiben
  help                     Diese Hilfe
  quit                     Beenden";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Action(Action),
    List,
    Render(Option<PathBuf>),
    Help,
    Quit,
    /// Blank line or a voice command without text.
    Nothing,
}

/// Parse one input line.
pub fn parse_line(line: &str) -> Result<ReplCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "" => ReplCommand::Nothing,
        "click" | "select" | "jump" => {
            if rest.is_empty() {
                return Err("click braucht eine Region-ID".to_string());
            }
            ReplCommand::Action(Action::Select(rest.to_string()))
        }
        "voice" if rest.is_empty() => ReplCommand::Nothing,
        "voice" => ReplCommand::Action(Action::Voice(rest.to_string())),
        "example" => ReplCommand::Action(Action::LoadExample),
        "find" => ReplCommand::Action(Action::Find(rest.to_string())),
        "note" => ReplCommand::Action(Action::SetNote(rest.to_string())),
        "save" => ReplCommand::Action(Action::SaveNote),
        "delete" => ReplCommand::Action(Action::DeleteSelection),
        "clear" | "esc" => ReplCommand::Action(Action::Clear),
        "session" => ReplCommand::Action(Action::SetSession(parse_number(rest)?)),
        "intensity" => ReplCommand::Action(Action::SetIntensity(parse_number(rest)?)),
        "layer" => {
            let (name, state) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "layer braucht <name> on|off".to_string())?;
            let layer: Layer = name.parse()?;
            let on = match state.trim().to_lowercase().as_str() {
                "on" | "an" | "1" => true,
                "off" | "aus" | "0" => false,
                other => return Err(format!("Unbekannter Zustand: {other}. Use on or off")),
            };
            ReplCommand::Action(Action::SetLayer { layer, on })
        }
        "isolate" => ReplCommand::Action(Action::SetIsolation(rest.parse::<Isolation>()?)),
        "reset" => ReplCommand::Action(Action::Reset),
        "list" => ReplCommand::List,
        "render" => ReplCommand::Render((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => return Err(format!("Unbekannter Befehl: {other} (help zeigt alle Befehle)")),
    };
    Ok(command)
}

fn parse_number(text: &str) -> Result<i64, String> {
    text.parse()
        .map_err(|_| format!("Zahl erwartet, erhalten: {text:?}"))
}

/// Run an interactive session on stdin/stdout.
pub fn execute(config: &Config) -> Result<()> {
    let mut controller = open_controller(config, None)?;
    let stdin = std::io::stdin();
    let prompt = stdin.is_terminal();
    let mut stdout = std::io::stdout().lock();
    run_session(&mut controller, stdin.lock(), &mut stdout, prompt)
}

/// Feed lines from `input` to the controller until EOF or `quit`.
pub fn run_session<P: AnnotationPersistence>(
    controller: &mut Controller<Diagram, P>,
    input: impl BufRead,
    out: &mut impl Write,
    prompt: bool,
) -> Result<()> {
    writeln!(out, "{}", bodymap_core::Status::Ready)?;

    let mut lines = input.lines();
    loop {
        if prompt {
            let view = controller.state().view;
            write!(out, "[S{} I{}]> ", view.session, view.intensity)?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "? {message}")?;
                continue;
            }
        };
        debug!(?command, "REPL command");

        match command {
            ReplCommand::Action(action) => {
                if let Some(status) = controller.dispatch(action) {
                    writeln!(out, "{status}")?;
                }
            }
            ReplCommand::List => write_rows(controller, &controller.rows(), out)?,
            ReplCommand::Render(None) => {
                writeln!(out, "{}", render(controller, OutputFormat::Svg)?)?;
            }
            ReplCommand::Render(Some(path)) => {
                let svg = render(controller, OutputFormat::Svg)?;
                write_output(&path, &svg)?;
            }
            ReplCommand::Help => writeln!(out, "{HELP}")?,
            ReplCommand::Quit => break,
            ReplCommand::Nothing => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bodymap_core::{Dictionary, MemoryStore};
    use std::io::Cursor;

    fn run(script: &str) -> (Controller<Diagram, MemoryStore>, String) {
        let mut controller = Controller::new(
            Diagram::front(Dictionary::builtin()).unwrap(),
            MemoryStore::new(),
        );
        let mut out = Vec::new();
        run_session(&mut controller, Cursor::new(script), &mut out, false).unwrap();
        (controller, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_actions() {
        assert_eq!(
            parse_line("click bone_spine").unwrap(),
            ReplCommand::Action(Action::Select("bone_spine".into()))
        );
        assert_eq!(
            parse_line("  voice Quad links 7/10 ").unwrap(),
            ReplCommand::Action(Action::Voice("Quad links 7/10".into()))
        );
        assert_eq!(
            parse_line("layer nerves on").unwrap(),
            ReplCommand::Action(Action::SetLayer {
                layer: Layer::Nerves,
                on: true
            })
        );
        assert_eq!(
            parse_line("isolate muscles").unwrap(),
            ReplCommand::Action(Action::SetIsolation(Isolation::Only(Layer::Muscles)))
        );
        assert_eq!(
            parse_line("render out/map.svg").unwrap(),
            ReplCommand::Render(Some(PathBuf::from("out/map.svg")))
        );
        assert_eq!(parse_line("note").unwrap(), ReplCommand::Action(Action::SetNote(String::new())));
    }

    #[test]
    fn test_parse_blank_and_errors() {
        assert_eq!(parse_line("").unwrap(), ReplCommand::Nothing);
        assert_eq!(parse_line("voice   ").unwrap(), ReplCommand::Nothing);
        assert!(parse_line("session zwei").is_err());
        assert!(parse_line("layer nerves").is_err());
        assert!(parse_line("layer organs on").is_err());
        assert!(parse_line("dance").is_err());
    }

    #[test]
    fn test_session_script() {
        let (controller, out) = run(
            "voice Brachialis rechts Schmerz 6/10\nsave\nlist\nsession 2\nlist\nquit\nsave\n",
        );
        assert!(out.contains("Voice: Brachialis (rechts) • Intensität 6/10"));
        assert!(out.contains("Gespeichert: Brachialis (rechts) (Session 1)"));
        assert!(out.contains("Brachialis (rechts) [muscle_brachialis_r] MUSCLE"));
        assert!(out.contains("Keine Markierungen in Session 2."));
        assert_eq!(controller.state().annotations.len(), 1);
        assert_eq!(controller.state().view.session.value(), 2);
    }

    #[test]
    fn test_bad_line_does_not_stop_session() {
        let (controller, out) = run("session x\nclick bone_spine\n");
        assert!(out.contains("? Zahl erwartet"));
        assert!(out.contains("Auswahl: Wirbelsäule (bone)"));
        assert!(controller.state().selection.is_some());
    }
}
