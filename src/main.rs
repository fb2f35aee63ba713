// Command line front end for the league engine. Everything here is argument handling and printing.
use std::{collections::HashMap, path::PathBuf, process::ExitCode};

use clap::{Args, Parser, Subcommand};
use ordinal::ToOrdinal as _;
use rand::{rngs::StdRng, SeedableRng};
use time::{Date, OffsetDateTime};
use tracing::error;

use league_engine::{
    config::LeagueConfig, db::{self, snapshot}, error::{LeagueError, LeagueResult}, logging,
    logic::{
        blackout::BlackoutDate, division::Division, game::Game,
        playoffs::{self, PlayoffStatus}, schedule_generator, season::Season, simulation,
        standings::{self, StandingsRow}, team::Team, time::{iso_date_string, parse_iso_date, GameDay},
        types::{Db, DivisionId, GameId, Score, SeasonId, TeamId},
    },
};

/// Round-robin league scheduling, standings and playoffs
#[derive(Parser)]
#[command(name = "league")]
#[command(about = "Schedules double round-robin divisions, keeps the standings and runs the playoffs")]
struct Cli {
    /// Database file (overrides DATABASE_PATH)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Snapshot directory (overrides SNAPSHOT_DIR)
    #[arg(long, global = true)]
    snapshot_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error (overrides LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Season to work on. Defaults to the active season.
    #[arg(long, global = true)]
    season: Option<SeasonId>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create or migrate the database
    Init {
        /// Fill an empty database with the demo season
        #[arg(long)]
        seed: bool,
    },
    /// Manage seasons
    #[command(subcommand)]
    Season(SeasonCommand),
    /// Manage divisions
    #[command(subcommand)]
    Division(DivisionCommand),
    /// Manage teams
    #[command(subcommand)]
    Team(TeamCommand),
    /// Manage dates with no games
    #[command(subcommand)]
    Blackout(BlackoutCommand),
    /// Generate or show the schedule
    #[command(subcommand)]
    Schedule(ScheduleCommand),
    /// Show division standings
    Standings {
        #[arg(long)]
        division: Option<DivisionId>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Record the score of a game
    Result {
        game: GameId,
        home_score: Score,
        away_score: Score,
    },
    /// Seed, advance or inspect the playoffs
    #[command(subcommand)]
    Playoffs(PlayoffCommand),
    /// Play the whole season with random results
    Simulate {
        /// Random seed for a repeatable run
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Take or list database snapshots
    #[command(subcommand)]
    Snapshot(SnapshotCommand),
    /// Season totals
    Stats,
    /// Unplayed games from today on
    Upcoming {
        #[arg(long, default_value = "10")]
        limit: u32,
        /// Start from this day instead of today (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Only the next game of this team
        #[arg(long)]
        team: Option<String>,
    },
    /// Latest results
    Recent {
        #[arg(long, default_value = "10")]
        limit: u32,
    },
}

#[derive(Subcommand)]
enum SeasonCommand {
    /// Create a season and make it the active one
    Create {
        name: String,
        /// First possible game date (YYYY-MM-DD)
        start_date: String,
        #[arg(long, default_value = "Saturday")]
        game_day: String,
    },
    /// Show the season
    Show,
}

#[derive(Subcommand)]
enum DivisionCommand {
    Add { name: String },
    List,
}

#[derive(Subcommand)]
enum TeamCommand {
    Add(TeamArgs),
    /// Deactivate a team. Its played games stay.
    Remove { team: TeamId },
    List {
        #[arg(long)]
        division: Option<DivisionId>,
    },
}

#[derive(Args)]
struct TeamArgs {
    name: String,
    #[arg(long)]
    division: DivisionId,
    #[arg(long)]
    short_name: Option<String>,
    #[arg(long)]
    color_hex: Option<String>,
    #[arg(long)]
    color_name: Option<String>,
}

#[derive(Subcommand)]
enum BlackoutCommand {
    Add {
        /// YYYY-MM-DD
        date: String,
        #[arg(long)]
        reason: Option<String>,
    },
    Remove { blackout: u32 },
    List,
}

#[derive(Subcommand)]
enum ScheduleCommand {
    /// Replace the schedule of one division, or all of them
    Generate {
        #[arg(long)]
        division: Option<DivisionId>,
    },
    Show {
        #[arg(long)]
        division: Option<DivisionId>,
    },
}

#[derive(Subcommand)]
enum PlayoffCommand {
    Create {
        #[arg(long)]
        division: Option<DivisionId>,
    },
    /// Put the semifinal winners into the final
    Advance {
        #[arg(long)]
        division: Option<DivisionId>,
    },
    Status {
        #[arg(long)]
        division: Option<DivisionId>,
    },
}

#[derive(Subcommand)]
enum SnapshotCommand {
    Take {
        #[arg(long, default_value = "manual")]
        reason: String,
    },
    List,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = LeagueConfig::from_env()
        .with_overrides(cli.database.clone(), cli.snapshot_dir.clone(), cli.log_level.clone());
    logging::init(&config.log_level);

    match run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: &LeagueConfig) -> LeagueResult<()> {
    let db = db::connect(&config.database_path).await?;

    match cli.command {
        Command::Init { seed } => {
            println!("Database ready at {}", config.database_path.display());
            if seed {
                match db::seed_demo(&db).await? {
                    true => println!("Seeded the demo season"),
                    false => println!("Database already has data, nothing seeded"),
                }
            }
        }
        Command::Season(SeasonCommand::Create { name, start_date, game_day }) => {
            let start_date = parse_iso_date(&start_date)?;
            let game_day: GameDay = game_day.parse()?;
            take_snapshot(&db, config, "before_season_create").await?;

            let season = Season::create(&db, &name, start_date, game_day).await?;
            println!("Created season {} \"{}\", games on {}s from {}",
                season.id, season.name, season.game_day, iso_date_string(season.first_game_date()));
        }
        Command::Season(SeasonCommand::Show) => {
            let season = current_season(&db, cli.season).await?;
            println!("{} \"{}\"{}", season.id, season.name, if season.is_active { " (active)" } else { "" });
            println!("Starts {}, games on {}s", iso_date_string(season.start_date), season.game_day);
            for division in Division::all(&db, season.id).await? {
                println!("  [{}] {}", division.id, division.name);
            }
        }
        Command::Division(DivisionCommand::Add { name }) => {
            let season = current_season(&db, cli.season).await?;
            let division = Division::create(&db, season.id, &name).await?;
            println!("Added division {} \"{}\"", division.id, division.name);
        }
        Command::Division(DivisionCommand::List) => {
            let season = current_season(&db, cli.season).await?;
            for division in Division::all(&db, season.id).await? {
                let teams = Team::roster(&db, season.id, division.id).await?.len();
                println!("[{}] {} ({teams} teams)", division.id, division.name);
            }
        }
        Command::Team(TeamCommand::Add(args)) => {
            let season = current_season(&db, cli.season).await?;
            let mut team = Team::build(&args.name, args.short_name.as_deref(), season.id, args.division);
            if let (Some(hex), Some(colour)) = (args.color_hex.as_deref(), args.color_name.as_deref()) {
                team = team.with_colors(hex, colour);
            }
            team.add(&db).await?;
            println!("Added team {} \"{}\" ({})", team.id, team.name, team.short_name);
        }
        Command::Team(TeamCommand::Remove { team }) => {
            Team::deactivate(&db, team).await?;
            println!("Removed team {team}. Regenerate the schedule to drop its future games.");
        }
        Command::Team(TeamCommand::List { division }) => {
            let season = current_season(&db, cli.season).await?;
            for team in Team::all_active(&db, season.id).await? {
                if division.is_some_and(|d| d != team.division_id) {
                    continue;
                }
                println!("[{}] {:<24} {:<4} {} ({}) division {}",
                    team.id, team.name, team.short_name, team.color_hex, team.color_name, team.division_id);
            }
        }
        Command::Blackout(BlackoutCommand::Add { date, reason }) => {
            let season = current_season(&db, cli.season).await?;
            let blackout = BlackoutDate::add(&db, season.id, parse_iso_date(&date)?, reason.as_deref()).await?;
            println!("Added blackout {} on {}. Regenerate the schedule to apply it.", blackout.id, iso_date_string(blackout.date));
        }
        Command::Blackout(BlackoutCommand::Remove { blackout }) => {
            BlackoutDate::delete(&db, blackout).await?;
            println!("Removed blackout {blackout}");
        }
        Command::Blackout(BlackoutCommand::List) => {
            let season = current_season(&db, cli.season).await?;
            for blackout in BlackoutDate::for_season(&db, season.id).await? {
                println!("[{}] {} {}", blackout.id, iso_date_string(blackout.date), blackout.reason.unwrap_or_default());
            }
        }
        Command::Schedule(ScheduleCommand::Generate { division }) => {
            let season = current_season(&db, cli.season).await?;
            take_snapshot(&db, config, "before_schedule_generate").await?;
            match division {
                Some(id) => {
                    let games = schedule_generator::generate_schedule(&db, season.id, id).await?;
                    println!("Division {id}: {} games scheduled", games.len());
                }
                None => {
                    let total = schedule_generator::regenerate_all_schedules(&db, season.id).await?;
                    println!("{total} games scheduled");
                }
            }
        }
        Command::Schedule(ScheduleCommand::Show { division }) => {
            let season = current_season(&db, cli.season).await?;
            let names = team_names(&db, season.id).await?;
            let mut current_date: Option<Date> = None;
            for game in Game::schedule(&db, season.id, division).await? {
                if current_date != Some(game.date) {
                    println!("{}", iso_date_string(game.date));
                    current_date = Some(game.date);
                }
                println!("  {}", describe_game(&game, &names));
            }
        }
        Command::Standings { division, json } => {
            let season = current_season(&db, cli.season).await?;
            for division in selected_divisions(&db, season.id, division).await? {
                let rows = standings::get_standings(&db, season.id, division.id).await?;
                if json {
                    let text = serde_json::to_string_pretty(&rows)
                        .map_err(|e| LeagueError::InvalidInput(e.to_string()))?;
                    println!("{text}");
                } else {
                    println!("{}", division.name);
                    print_standings(&rows);
                }
            }
        }
        Command::Result { game, home_score, away_score } => {
            let played = league_engine::record_result(&db, game, home_score, away_score).await?;
            let names = team_names(&db, played.season_id).await?;
            println!("{}", describe_game(&played, &names));
        }
        Command::Playoffs(command) => {
            let season = current_season(&db, cli.season).await?;
            let division = match &command {
                PlayoffCommand::Create { division } | PlayoffCommand::Advance { division } | PlayoffCommand::Status { division } => *division,
            };

            for d in selected_divisions(&db, season.id, division).await? {
                match command {
                    PlayoffCommand::Create { .. } => {
                        let created = playoffs::create_playoff_games(&db, season.id, d.id).await?;
                        println!("{}: {}", d.name, if created { "playoffs created" } else { "nothing to create" });
                    }
                    PlayoffCommand::Advance { .. } => {
                        let progressed = playoffs::update_final_teams(&db, season.id, d.id).await?;
                        println!("{}: {}", d.name, if progressed { "final teams set" } else { "final not ready" });
                    }
                    PlayoffCommand::Status { .. } => {
                        let status = playoffs::playoff_status(&db, season.id, d.id).await?;
                        println!("{}: {}", d.name, describe_status(status));
                    }
                }
            }
        }
        Command::Simulate { seed } => {
            let season = current_season(&db, cli.season).await?;
            let mut rng = match seed {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_os_rng(),
            };

            let summary = simulation::simulate_season(&db, season.id, &mut rng).await?;
            let names = team_names(&db, season.id).await?;
            println!("Played {} regular season and {} playoff games", summary.regular_games, summary.playoff_games);
            for (division_id, champion) in summary.champions {
                println!("Division {division_id} champion: {}", team_name(&names, champion));
            }
        }
        Command::Snapshot(SnapshotCommand::Take { reason }) => {
            let path = snapshot::take(&db, &config.snapshot_dir, &reason).await?;
            println!("{}", path.display());
        }
        Command::Snapshot(SnapshotCommand::List) => {
            for path in snapshot::list(&config.snapshot_dir)? {
                println!("{}", path.display());
            }
        }
        Command::Stats => {
            let season = current_season(&db, cli.season).await?;
            let stats = Season::stats(&db, season.id).await?;
            println!("{}", season.name);
            println!("  Divisions: {}", stats.total_divisions);
            println!("  Teams:     {}", stats.total_teams);
            println!("  Games:     {} ({} played, {} remaining)", stats.total_games, stats.played_games, stats.remaining_games);
        }
        Command::Upcoming { limit, from, team } => {
            let season = current_season(&db, cli.season).await?;
            let today = match from {
                Some(text) => parse_iso_date(&text)?,
                None => OffsetDateTime::now_utc().date(),
            };
            let names = team_names(&db, season.id).await?;

            let games = match team {
                Some(name) => {
                    let team = Team::find_by_name(&db, season.id, &name).await?
                        .ok_or_else(|| LeagueError::InvalidInput(format!("no team matches \"{name}\"")))?;
                    Game::next_for_team(&db, season.id, team.id, today).await?.into_iter().collect()
                }
                None => Game::upcoming(&db, season.id, today, limit).await?,
            };

            for game in games.iter() {
                println!("{} {}", iso_date_string(game.date), describe_game(game, &names));
            }
        }
        Command::Recent { limit } => {
            let season = current_season(&db, cli.season).await?;
            let names = team_names(&db, season.id).await?;
            for game in Game::recent_results(&db, season.id, limit).await? {
                println!("{} {}", iso_date_string(game.date), describe_game(&game, &names));
            }
        }
    }

    Ok(())
}

// The season given on the command line, or the active one.
async fn current_season(db: &Db, season_id: Option<SeasonId>) -> LeagueResult<Season> {
    match season_id {
        Some(id) => Season::fetch(db, id).await?.ok_or_else(|| LeagueError::not_found("season", id)),
        None => Season::active(db).await?
            .ok_or_else(|| LeagueError::InvalidInput("there is no active season, create one first".to_string())),
    }
}

async fn selected_divisions(db: &Db, season_id: SeasonId, division_id: Option<DivisionId>) -> LeagueResult<Vec<Division>> {
    match division_id {
        Some(id) => Division::fetch(db, season_id, id).await?
            .map(|d| vec![d])
            .ok_or_else(|| LeagueError::not_found("division", id)),
        None => Division::all(db, season_id).await,
    }
}

async fn take_snapshot(db: &Db, config: &LeagueConfig, reason: &str) -> LeagueResult<()> {
    let path = snapshot::take(db, &config.snapshot_dir, reason).await?;
    println!("Snapshot saved to {}", path.display());
    Ok(())
}

async fn team_names(db: &Db, season_id: SeasonId) -> LeagueResult<HashMap<TeamId, String>> {
    let teams = Team::all(db, season_id).await?;
    Ok(teams.into_iter().map(|t| (t.id, t.name)).collect())
}

fn team_name(names: &HashMap<TeamId, String>, id: TeamId) -> String {
    names.get(&id).cloned().unwrap_or_else(|| format!("team {id}"))
}

fn describe_game(game: &Game, names: &HashMap<TeamId, String>) -> String {
    let home = team_name(names, game.home_id);
    let away = team_name(names, game.away_id);
    let label = match game.playoff_stage {
        Some(stage) => stage.to_string(),
        None => format!("round {}", game.round),
    };

    match game.scores() {
        Some((h, a)) => format!("[{}] {label}: {home} {h} - {a} {away}", game.id),
        None => format!("[{}] {label}: {home} vs {away}", game.id),
    }
}

fn describe_status(status: PlayoffStatus) -> &'static str {
    match status {
        PlayoffStatus::NotStarted => "not started",
        PlayoffStatus::SemifinalsScheduled => "semifinals scheduled",
        PlayoffStatus::SemifinalsComplete => "semifinals complete",
        PlayoffStatus::FinalTeamsResolved => "final teams resolved",
        PlayoffStatus::FinalComplete => "final complete",
    }
}

fn print_standings(rows: &[StandingsRow]) {
    println!("{:<5} {:<24} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4} {:>4}",
        "", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts");
    for row in rows {
        let marker = if row.qualifies_for_playoffs { "*" } else { "" };
        println!("{:<5} {:<24} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>+4} {:>4}",
            format!("{}{marker}", row.rank.to_ordinal_string()), row.name,
            row.played, row.wins, row.draws, row.losses, row.goals_for, row.goals_against, row.goal_diff, row.points);
    }
}
