// Command line - the HTTP server plus the operator maintenance commands.
//
// The score commands read a text file, talk to the database through the
// import service, and print a report for the operator to read. The email
// commands render a message and hand it to the configured mailer.

use crate::core::email::{
    generate_invitation_token, EmailConfig, EmailService, Invitation, DEFAULT_REMINDER_DAYS,
    INVITATION_TTL_DAYS,
};
use crate::core::imports::{
    render_report, DuplicatePair, ImportService, ScoreUpdateReport, DEFAULT_FOCUS_CLASSIFICATION,
};
use crate::core::moderation::Role;
use crate::infra::email::LogMailer;
use crate::infra::imports::SqliteGameStore;
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use sqlx::{Pool, Sqlite};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "statiq", about = "StatIQ backend server and data tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API (the default)
    Serve,

    /// Analyse a week of pasted scores and optionally insert them
    ImportScores {
        /// Text file with one `Team 21, Team 14` line per game
        #[arg(long)]
        file: PathBuf,
        /// Game date, YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        week: u32,
        /// Classification the import is centred on
        #[arg(long, default_value = DEFAULT_FOCUS_CLASSIFICATION)]
        classification: String,
        /// JSON object mapping alternate spellings to official team names
        #[arg(long)]
        aliases: Option<PathBuf>,
        /// Insert resolvable games instead of only printing the SQL
        #[arg(long)]
        apply: bool,
    },

    /// Set final scores on existing games
    UpdateScores {
        #[arg(long)]
        file: PathBuf,
    },

    /// Find games entered twice, optionally deleting the extra copies
    DedupeGames {
        #[arg(long)]
        delete: bool,
    },

    /// Send the delivery check email to one address
    SendTestEmail {
        #[arg(long)]
        to: String,
    },

    /// Invite a coach, admin or player to a team with a fresh token
    Invite {
        #[command(flatten)]
        invitee: Invitee,
    },

    /// Remind someone that their team invitation is about to lapse
    RemindInvite {
        #[command(flatten)]
        invitee: Invitee,
        /// Token from the original invitation
        #[arg(long)]
        token: String,
        #[arg(long, default_value_t = DEFAULT_REMINDER_DAYS)]
        days_remaining: u32,
    },
}

#[derive(Debug, clap::Args)]
pub struct Invitee {
    #[arg(long)]
    pub email: String,
    /// Full name; the greeting uses the first word
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub team: String,
    /// Who is sending the invitation
    #[arg(long)]
    pub inviter: String,
    /// coach, admin or player
    #[arg(long, value_parser = parse_invite_role)]
    pub role: Role,
}

fn parse_invite_role(value: &str) -> Result<Role, String> {
    match Role::parse(&value.trim().to_lowercase()) {
        Some(Role::Fan) => Err("fans are not invited to teams".to_string()),
        Some(role) => Ok(role),
        None => Err(format!("unknown role {:?}; use coach, admin or player", value)),
    }
}

impl Invitee {
    fn invitation<'a>(&'a self, token: &'a str) -> Invitation<'a> {
        Invitation {
            to_email: &self.email,
            to_name: self.name.as_deref(),
            team_name: &self.team,
            inviter_name: &self.inviter,
            token,
            role: self.role,
        }
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Run an operator command and return the report to print.
/// `Serve` is handled by main and yields nothing here.
pub async fn run(command: Command, pool: Pool<Sqlite>, email: &EmailConfig) -> Result<String> {
    let service = ImportService::new(SqliteGameStore::new(pool));
    let mailer = EmailService::new(LogMailer::new(), email.clone());

    match command {
        Command::Serve => Ok(String::new()),
        Command::ImportScores {
            file,
            date,
            week,
            classification,
            aliases,
            apply,
        } => {
            let text = read_file(&file)?;
            let aliases = aliases.as_deref().map(read_file).transpose()?;
            let plan = service
                .plan_import(&text, &classification, aliases.as_deref())
                .await?;

            let mut out = render_report(&plan, date, week);
            if apply {
                let inserted = service.apply_import(&plan, date).await?;
                let _ = writeln!(out, "\nInserted {} games.", inserted);
            } else {
                let _ = writeln!(out, "\nDry run: pass --apply to insert the resolvable games.");
            }
            Ok(out)
        }
        Command::UpdateScores { file } => {
            let text = read_file(&file)?;
            let report = service.update_scores(&text).await?;
            Ok(render_update_report(&report))
        }
        Command::DedupeGames { delete } => {
            let pairs = service.find_duplicates().await?;
            let mut out = render_duplicates(&pairs);
            if delete && !pairs.is_empty() {
                let deleted = service.delete_duplicates(&pairs).await?;
                let _ = writeln!(out, "\nDeleted {} duplicate games.", deleted);
            } else if !pairs.is_empty() {
                let _ = writeln!(out, "\nDry run: pass --delete to remove the duplicates.");
            }
            Ok(out)
        }
        Command::SendTestEmail { to } => {
            let id = mailer.send_test_email(&to).await?;
            Ok(format!("Test email sent to {} ({}).\n", to.trim(), id))
        }
        Command::Invite { invitee } => {
            let token = generate_invitation_token();
            let id = mailer.send_invitation(&invitee.invitation(&token)).await?;
            Ok(format!(
                "Invited {} to {} as {} ({}).\nAccept link (valid {} days): {}\n",
                invitee.email.trim(),
                invitee.team,
                invitee.role.as_str(),
                id,
                INVITATION_TTL_DAYS,
                mailer.config().accept_url(&token)
            ))
        }
        Command::RemindInvite {
            invitee,
            token,
            days_remaining,
        } => {
            if days_remaining == 0 || days_remaining > INVITATION_TTL_DAYS {
                return Err(anyhow!(
                    "--days-remaining must be between 1 and {}",
                    INVITATION_TTL_DAYS
                ));
            }
            let id = mailer
                .send_invitation_reminder(&invitee.invitation(token.trim()), days_remaining)
                .await?;
            Ok(format!(
                "Reminded {} about {} ({} days left, {}).\n",
                invitee.email.trim(),
                invitee.team,
                days_remaining,
                id
            ))
        }
    }
}

fn render_update_report(report: &ScoreUpdateReport) -> String {
    let mut out = String::new();
    for (line, game_id) in &report.updated {
        let _ = writeln!(
            out,
            "Updated game {}: {} {} - {} {}",
            game_id, line.home, line.home_score, line.away_score, line.away
        );
    }
    for line in &report.not_found {
        let _ = writeln!(out, "Not found: {} vs {}", line.home, line.away);
    }
    for line in &report.unparsed {
        let _ = writeln!(out, "Could not parse: {}", line);
    }
    let _ = writeln!(
        out,
        "\n{} updated, {} not found, {} unparsed",
        report.updated.len(),
        report.not_found.len(),
        report.unparsed.len()
    );
    out
}

fn score(value: Option<u32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn render_duplicates(pairs: &[DuplicatePair]) -> String {
    if pairs.is_empty() {
        return "No duplicate games found.\n".to_string();
    }

    let mut out = format!("Found {} duplicate games:\n", pairs.len());
    for pair in pairs {
        let _ = writeln!(
            out,
            "  keep #{} / drop #{}: {} {} - {} {} ({})",
            pair.keep.id,
            pair.duplicate.id,
            pair.keep.home_team,
            score(pair.keep.home_score),
            score(pair.keep.away_score),
            pair.keep.away_team,
            pair.keep.kickoff_at
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::database::fixtures::insert_team;
    use crate::infra::database::memory_pool;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    async fn run_offline(command: Command, pool: Pool<Sqlite>) -> Result<String> {
        run(command, pool, &EmailConfig::default()).await
    }

    async fn game_count(pool: &Pool<Sqlite>) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM games")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[test]
    fn test_serve_is_the_default() {
        let cli = Cli::try_parse_from(["statiq"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from([
            "statiq",
            "import-scores",
            "--file",
            "week9.txt",
            "--date",
            "2025-10-24",
            "--week",
            "9",
        ])
        .unwrap();
        match cli.command {
            Some(Command::ImportScores {
                classification,
                apply,
                date,
                ..
            }) => {
                assert_eq!(classification, "5A-D1");
                assert!(!apply);
                assert_eq!(date, NaiveDate::from_ymd_opt(2025, 10, 24).unwrap());
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from(["statiq", "import-scores", "--date", "not-a-date"]).is_err());
    }

    #[tokio::test]
    async fn test_import_dry_run_then_apply() {
        let pool = memory_pool().await;
        insert_team(&pool, "Joshua", "5A-D1").await;
        insert_team(&pool, "Burleson", "5A-D1").await;
        let scores = temp_file("Joshua 28, Burleson 21\nMystery Prep 7, Joshua 35\n");

        let command = |apply| Command::ImportScores {
            file: scores.path().to_path_buf(),
            date: NaiveDate::from_ymd_opt(2025, 10, 24).unwrap(),
            week: 9,
            classification: "5A-D1".to_string(),
            aliases: None,
            apply,
        };

        let report = run_offline(command(false), pool.clone()).await.unwrap();
        assert!(report.contains("WEEK 9 ANALYSIS"));
        assert!(report.contains("Mystery Prep"));
        assert!(report.contains("Dry run"));
        assert_eq!(game_count(&pool).await, 0);

        let report = run_offline(command(true), pool.clone()).await.unwrap();
        assert!(report.contains("Inserted 1 games."));
        assert_eq!(game_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_update_then_dedupe() {
        let pool = memory_pool().await;
        insert_team(&pool, "Joshua", "5A-D1").await;
        insert_team(&pool, "Burleson", "5A-D1").await;
        let scores = temp_file("Joshua 28, Burleson 21\n");

        for _ in 0..2 {
            run_offline(
                Command::ImportScores {
                    file: scores.path().to_path_buf(),
                    date: NaiveDate::from_ymd_opt(2025, 10, 24).unwrap(),
                    week: 9,
                    classification: "5A-D1".to_string(),
                    aliases: None,
                    apply: true,
                },
                pool.clone(),
            )
            .await
            .unwrap();
        }
        assert_eq!(game_count(&pool).await, 2);

        let report = run_offline(Command::DedupeGames { delete: false }, pool.clone())
            .await
            .unwrap();
        assert!(report.contains("Found 1 duplicate games"));
        assert_eq!(game_count(&pool).await, 2);

        let report = run_offline(Command::DedupeGames { delete: true }, pool.clone())
            .await
            .unwrap();
        assert!(report.contains("Deleted 1 duplicate games."));
        assert_eq!(game_count(&pool).await, 1);

        let updates = temp_file("Joshua 31, Burleson 21\nNowhere 1, Elsewhere 0\nnonsense\n");
        let report = run_offline(
            Command::UpdateScores {
                file: updates.path().to_path_buf(),
            },
            pool.clone(),
        )
        .await
        .unwrap();
        assert!(report.contains("1 updated, 1 not found, 1 unparsed"));
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let pool = memory_pool().await;
        let err = run_offline(
            Command::UpdateScores {
                file: PathBuf::from("/definitely/not/here.txt"),
            },
            pool,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    fn invitee(role: Role) -> Invitee {
        Invitee {
            email: "hayes@joshua.edu".to_string(),
            name: Some("Mike Hayes".to_string()),
            team: "Joshua Owls".to_string(),
            inviter: "Dana Cole".to_string(),
            role,
        }
    }

    #[test]
    fn test_invite_role_parsing() {
        let cli = Cli::try_parse_from([
            "statiq", "invite", "--email", "a@b.co", "--team", "Owls", "--inviter", "Dana",
            "--role", "Coach",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Invite { invitee }) => {
                assert_eq!(invitee.role, Role::Coach);
                assert!(invitee.name.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }

        for role in ["fan", "referee"] {
            assert!(Cli::try_parse_from([
                "statiq", "invite", "--email", "a@b.co", "--team", "Owls", "--inviter", "Dana",
                "--role", role,
            ])
            .is_err());
        }
    }

    #[tokio::test]
    async fn test_email_commands() {
        let pool = memory_pool().await;

        let report = run_offline(
            Command::SendTestEmail {
                to: "ops@usestatiq.com".to_string(),
            },
            pool.clone(),
        )
        .await
        .unwrap();
        assert_eq!(report, "Test email sent to ops@usestatiq.com (log-1).\n");

        let report = run_offline(
            Command::Invite {
                invitee: invitee(Role::Player),
            },
            pool.clone(),
        )
        .await
        .unwrap();
        assert!(report.starts_with("Invited hayes@joshua.edu to Joshua Owls as player"));
        assert!(report.contains("(valid 7 days): https://app.usestatiq.com/accept-invite?token="));

        let report = run_offline(
            Command::RemindInvite {
                invitee: invitee(Role::Coach),
                token: "abc123".to_string(),
                days_remaining: 3,
            },
            pool.clone(),
        )
        .await
        .unwrap();
        assert!(report.contains("3 days left"));

        let err = run_offline(
            Command::RemindInvite {
                invitee: invitee(Role::Coach),
                token: "abc123".to_string(),
                days_remaining: 0,
            },
            pool.clone(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("--days-remaining"));

        let err = run_offline(
            Command::SendTestEmail {
                to: "nobody".to_string(),
            },
            pool,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("Invalid recipient"));
    }
}
