use crate::commands::{Commands, ConflictChoice, StopArgs};
use crate::error::{CliError, Result as CliResult};
use crate::ticket_commands::TicketCommands;

use tt_core::TicketContext;
use tt_db::TicketRepository;
use tt_engine::{
    BatchStopSettings, ConflictResolution, EntryCorrection, ManualEntry, StartOptions,
    StopSettings, TimerService,
};

use log::debug;
use serde_json::{Value, json};
use uuid::Uuid;

pub const COMPANY_ENV: &str = "TT_COMPANY_ID";
pub const USER_ENV: &str = "TT_USER_ID";

/// Who the command runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub company_id: Uuid,
    pub user_id: Uuid,
}

impl Session {
    /// Flags win over environment variables.
    pub fn resolve(company: Option<Uuid>, user: Option<Uuid>) -> CliResult<Self> {
        Ok(Self {
            company_id: Self::id_from(company, "company", COMPANY_ENV)?,
            user_id: Self::id_from(user, "user", USER_ENV)?,
        })
    }

    fn id_from(flag: Option<Uuid>, argument: &'static str, env_var: &str) -> CliResult<Uuid> {
        if let Some(id) = flag {
            return Ok(id);
        }

        let raw = std::env::var(env_var).map_err(|_| {
            CliError::invalid_argument(argument, format!("required (or set {})", env_var))
        })?;
        raw.parse()
            .map_err(|e| CliError::invalid_argument(argument, format!("{} in {}", e, env_var)))
    }
}

/// Run one command and return its JSON output.
pub async fn execute(
    service: &TimerService,
    session: &Session,
    command: Commands,
) -> CliResult<Value> {
    let user_id = session.user_id;

    match command {
        Commands::Start {
            ticket_id,
            work_type,
            description,
            non_billable,
            on_conflict,
            stop_description,
        } => {
            let on_conflict = match on_conflict {
                None => None,
                Some(ConflictChoice::Both) => Some(ConflictResolution::Both),
                Some(ConflictChoice::Cancel) => Some(ConflictResolution::Cancel),
                Some(ConflictChoice::Switch) => {
                    let description = stop_description.ok_or_else(|| {
                        CliError::invalid_argument(
                            "stop-description",
                            "required with --on-conflict switch",
                        )
                    })?;
                    Some(ConflictResolution::Switch(StopSettings {
                        description,
                        work_type: service.settings().default_work_type.clone(),
                        billable: true,
                        add_comment: service.settings().comment_on_stop,
                    }))
                }
            };
            let options = StartOptions {
                work_type,
                description,
                billable: !non_billable,
                on_conflict,
            };

            let outcome = service.start_timer(user_id, ticket_id, options).await?;
            Ok(serde_json::to_value(outcome)?)
        }

        Commands::Pause { timer_id, reason } => {
            let entry = service.pause_timer(user_id, timer_id, &reason).await?;
            Ok(serde_json::to_value(entry)?)
        }

        Commands::Resume { timer_id } => {
            let entry = service.resume_timer(user_id, timer_id).await?;
            Ok(serde_json::to_value(entry)?)
        }

        Commands::Stop { timer_id, settings } => {
            let intent = service.request_stop(user_id, timer_id).await?;
            if settings.preview {
                return Ok(serde_json::to_value(intent)?);
            }

            let merged = merge_stop(intent.suggested, &settings);
            let entry = service.confirm_stop(user_id, timer_id, merged).await?;
            Ok(serde_json::to_value(entry)?)
        }

        Commands::StopAll { settings } => {
            let intents = service.request_stop_all(user_id).await?;
            if settings.preview {
                return Ok(serde_json::to_value(intents)?);
            }

            let by_timer = intents
                .into_iter()
                .map(|intent| {
                    (
                        intent.snapshot.timer_id,
                        merge_stop(intent.suggested, &settings),
                    )
                })
                .collect();
            let stopped = service
                .confirm_stop_all(user_id, BatchStopSettings::PerTimer(by_timer))
                .await?;
            Ok(serde_json::to_value(stopped)?)
        }

        Commands::Discard { timer_id } => {
            service.discard_timer(user_id, timer_id).await?;
            Ok(json!({ "discarded": timer_id }))
        }

        Commands::Status => {
            let timers = service.get_active_timers(user_id).await?;
            Ok(serde_json::to_value(timers)?)
        }

        Commands::Manual {
            ticket_id,
            started_at,
            ended_at,
            paused_minutes,
            work_type,
            description,
            non_billable,
        } => {
            let manual = ManualEntry {
                started_at,
                ended_at,
                paused_seconds: paused_minutes.saturating_mul(60),
                work_type: work_type
                    .unwrap_or_else(|| service.settings().default_work_type.clone()),
                description,
                billable: !non_billable,
            };

            let entry = service
                .create_manual_entry(user_id, ticket_id, manual)
                .await?;
            Ok(serde_json::to_value(entry)?)
        }

        Commands::Correct {
            entry_id,
            description,
            work_type,
            billable,
        } => {
            let correction = EntryCorrection {
                description,
                work_type,
                billable,
            };
            let entry = service.correct_entry(user_id, entry_id, correction).await?;
            Ok(serde_json::to_value(entry)?)
        }

        Commands::Delete { entry_id } => {
            service.delete_entry(user_id, entry_id).await?;
            Ok(json!({ "deleted": entry_id }))
        }

        Commands::Review { entry_id, status } => {
            let entry = service
                .transition_status(user_id, entry_id, status.into())
                .await?;
            Ok(serde_json::to_value(entry)?)
        }

        Commands::History { entry_id } => {
            let history = service.entry_history(entry_id).await?;
            Ok(serde_json::to_value(history)?)
        }

        Commands::Ticket { action } => match action {
            TicketCommands::Add {
                id,
                subject,
                priority,
                description,
            } => {
                let ticket = TicketContext {
                    ticket_id: id.unwrap_or_else(Uuid::new_v4),
                    company_id: session.company_id,
                    priority,
                    subject,
                    description,
                };
                debug!("Saving ticket {}", ticket.ticket_id);

                TicketRepository::upsert(service.store().pool(), &ticket, service.now()).await?;
                Ok(serde_json::to_value(ticket)?)
            }
            TicketCommands::Entries { ticket_id } => {
                let entries = service.ticket_entries(ticket_id).await?;
                Ok(serde_json::to_value(entries)?)
            }
        },
    }
}

fn merge_stop(suggested: StopSettings, args: &StopArgs) -> StopSettings {
    StopSettings {
        description: args
            .description
            .clone()
            .unwrap_or(suggested.description),
        work_type: args.work_type.clone().unwrap_or(suggested.work_type),
        billable: suggested.billable && !args.non_billable,
        add_comment: suggested.add_comment && !args.no_comment,
    }
}
