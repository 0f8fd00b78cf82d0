//! Line-oriented front-end for the campaign wizard.

use std::fmt::Write as _;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::app::{App, AppError, ASSISTANT_SUGGESTIONS};

const HELP: &str = "\
Commands:
  upload <path.csv>        validate a recipient list
  subject <text>           set the subject line
  body <text>              set the body (\\n for new lines)
  placeholder <column>     append {{column}} to the body
  personalize on|off       toggle per-recipient rendering
  ask <prompt>             ask the assistant to draft the email
  reset-chat               start a new conversation with the assistant
  preview | next | prev    show rendered previews
  summary                  review the campaign
  send                     send the campaign
  new                      start another campaign after sending
  help | quit";

/// Runs commands from `input` until it ends or `quit` is read. Failures are
/// printed and the session continues.
pub async fn run<R, W>(app: &mut App, input: R, mut output: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    output.write_all(format!("{}\n{}\n", app.step(), HELP).as_bytes()).await?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, argument) = line.split_once(' ').unwrap_or((line, ""));
        if command == "quit" || command == "exit" {
            break;
        }

        let reply = match execute(app, command, argument.trim()).await {
            Ok(reply) => reply,
            Err(e) => format!("Error: {}", e),
        };
        output.write_all(reply.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
    }

    Ok(())
}

async fn execute(app: &mut App, command: &str, argument: &str) -> Result<String, AppError> {
    let mut out = String::new();

    match command {
        "help" => out.push_str(HELP),
        "upload" => {
            let summary = app.upload_csv(argument).await?;
            let _ = writeln!(
                out,
                "Loaded {} recipients from {} ({} rows rejected)",
                summary.recipients, summary.file_name, summary.rejected_rows
            );
            if summary.unverified_addresses > 0 {
                let _ = writeln!(
                    out,
                    "{} addresses could not be verified locally and were kept as given",
                    summary.unverified_addresses
                );
            }
            render_table(app, &mut out);
        }
        "subject" => {
            app.set_subject(argument);
            let _ = write!(out, "Subject: {}", app.subject());
        }
        "body" => {
            app.set_body(argument.replace("\\n", "\n"));
            out.push_str("Body updated");
        }
        "placeholder" => {
            app.insert_placeholder(argument)?;
            let _ = write!(out, "Body: {}", app.body());
        }
        "personalize" => {
            let personalized = match argument {
                "on" => true,
                "off" => false,
                other => {
                    return Err(AppError::ValidationError(format!(
                        "expected `on` or `off`, got {:?}",
                        other
                    )))
                }
            };
            app.set_personalized(personalized);
            let _ = write!(out, "Personalization {}", argument);
        }
        "ask" => {
            if argument.is_empty() {
                out.push_str("Try one of:");
                for suggestion in ASSISTANT_SUGGESTIONS {
                    let _ = write!(out, "\n  {}", suggestion);
                }
            } else if let Some(reply) = app.ask_assistant(argument).await? {
                out.push_str(&reply.content);
            }
        }
        "reset-chat" => {
            app.reset_assistant();
            out.push_str(&app.chat().last().content);
        }
        "preview" => {
            app.settled_preview().await;
            render_preview(app, &mut out);
        }
        "next" => {
            app.next_preview();
            render_preview(app, &mut out);
        }
        "prev" => {
            app.previous_preview();
            render_preview(app, &mut out);
        }
        "summary" => {
            let _ = write!(out, "{}\n{}", app.step(), app.campaign_summary());
        }
        "send" => {
            let result = app.send_campaign().await?;
            let noun = if app.is_personalized() {
                "personalized emails"
            } else {
                "emails"
            };
            let _ = write!(out, "Sent: {} {}.", result.sent.len(), noun);
            if !result.failed.is_empty() {
                let _ = write!(out, " Failed: {}", result.failed.len());
            }
        }
        "new" => {
            app.start_new_campaign();
            let _ = write!(out, "{}", app.step());
        }
        other => {
            return Err(AppError::ValidationError(format!(
                "unknown command {:?}, try `help`",
                other
            )))
        }
    }

    Ok(out)
}

fn render_table(app: &App, out: &mut String) {
    let (columns, rows) = app.recipient_table();
    let _ = writeln!(out, "{}", columns.join(" | "));
    for row in rows {
        let _ = writeln!(out, "{}", row.join(" | "));
    }
}

fn render_preview(app: &App, out: &mut String) {
    let state = app.preview();
    if let Some(error) = &state.error {
        let _ = write!(out, "Preview failed: {}", error);
        return;
    }

    match app.current_preview() {
        Some(email) => {
            let _ = write!(
                out,
                "Preview {}/{} To: {}\nSubject: {}\n\n{}",
                app.preview_index() + 1,
                state.emails.len(),
                email.email,
                email.subject_or(app.subject()),
                email.rendered_body
            );
        }
        None if state.loading => out.push_str("Rendering previews..."),
        None => out.push_str("Upload recipients and compose an email to see preview"),
    }
}
