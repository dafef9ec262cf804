use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use stimacasa::api::{
    AddressValidationRequest, ApiClient, DashboardFeed, DashboardKind, PageRequest,
    RegisterUserRequest, TakeAssignmentRequest, UpdateUserRequest, UserRole, ValutazioneQueue,
};
use stimacasa::config::AppConfig;
use stimacasa::error::AppError;
use stimacasa::intake::{FormAnswers, IntakeFlow};
use stimacasa::session::{authenticate, FileStorage, Identity, Role, SessionGate};
use stimacasa::telemetry;
use tracing::info;

mod views;
mod wizard;

use wizard::{Prompter, WizardOutcome};

#[derive(Parser, Debug)]
#[command(
    name = "stimacasa",
    about = "Request property evaluations and run the brokerage back office from the terminal",
    version
)]
struct Cli {
    /// Override the configured API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Override the directory holding the persisted session
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and remember the identity for later commands
    Login(LoginArgs),
    /// Forget the stored identity
    Logout,
    /// Show the stored identity
    Whoami,
    /// Request a property evaluation
    Valuta(ValutaArgs),
    /// Show the admin or agent dashboard
    Dashboard(DashboardArgs),
    /// Manage back-office users (admin)
    Utenti {
        #[command(subcommand)]
        command: UtentiCommand,
    },
    /// List closed contracts (all for admins, own for agents)
    Contratti(PageArgs),
    /// Review automatic and in-verification valuations (admin)
    Valutazioni {
        #[command(subcommand)]
        command: ValutazioniCommand,
    },
    /// List or take assignments (agent)
    Incarichi {
        #[command(subcommand)]
        command: IncarichiCommand,
    },
    /// Ask the backend about an address
    Indirizzo {
        #[command(subcommand)]
        command: IndirizzoCommand,
    },
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    email: String,
    /// Read from stdin when omitted
    #[arg(long)]
    password: Option<String>,
}

#[derive(Args, Debug)]
struct ValutaArgs {
    /// JSON file with the complete answers, skipping the interactive prompts
    #[arg(long)]
    answers: Option<PathBuf>,
    /// Ask the backend for address suggestions on the first step
    #[arg(long)]
    verifica_indirizzo: bool,
}

#[derive(Args, Debug)]
struct DashboardArgs {
    #[arg(value_enum)]
    kind: DashboardArg,
    /// Number of listing pages to load
    #[arg(long, default_value_t = 1)]
    pages: u32,
}

#[derive(Args, Debug)]
struct PageArgs {
    #[arg(long, default_value_t = 0)]
    offset: u32,
    /// Defaults to APP_PAGE_SIZE
    #[arg(long)]
    limit: Option<u32>,
}

#[derive(Subcommand, Debug)]
enum UtentiCommand {
    List,
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, value_enum)]
        role: RoleArg,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long, value_enum)]
        role: Option<RoleArg>,
    },
}

#[derive(Subcommand, Debug)]
enum ValutazioniCommand {
    List {
        #[arg(long, value_enum)]
        kind: QueueArg,
    },
    Delete {
        #[arg(long, value_enum)]
        kind: QueueArg,
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
enum IncarichiCommand {
    List,
    /// Take charge of a valuation
    Take { valutazione_id: i64 },
}

#[derive(Subcommand, Debug)]
enum IndirizzoCommand {
    Verify {
        #[arg(long)]
        via: String,
        #[arg(long, default_value = "")]
        citta: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DashboardArg {
    Admin,
    Agent,
}

impl DashboardArg {
    fn kind(self) -> DashboardKind {
        match self {
            DashboardArg::Admin => DashboardKind::Admin,
            DashboardArg::Agent => DashboardKind::Agent,
        }
    }

    fn required_role(self) -> Role {
        match self {
            DashboardArg::Admin => Role::Admin,
            DashboardArg::Agent => Role::Agent,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RoleArg {
    Admin,
    Agent,
}

impl From<RoleArg> for UserRole {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Admin => UserRole::Admin,
            RoleArg::Agent => UserRole::Agent,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum QueueArg {
    SoloAi,
    InVerifica,
}

impl From<QueueArg> for ValutazioneQueue {
    fn from(value: QueueArg) -> Self {
        match value {
            QueueArg::SoloAi => ValutazioneQueue::SoloAi,
            QueueArg::InVerifica => ValutazioneQueue::InVerifica,
        }
    }
}

/// Everything a command needs: loaded config, the REST client and the hydrated session.
struct App {
    config: AppConfig,
    client: ApiClient,
    session: SessionGate<FileStorage>,
}

impl App {
    fn authorize(&self, role: Role) -> Result<&Identity, AppError> {
        Ok(self.session.authorize(role)?)
    }

    fn page(&self, args: &PageArgs) -> PageRequest {
        PageRequest {
            offset: args.offset,
            limit: args.limit.unwrap_or(self.config.api.page_size),
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {}", views::user_message(&err));
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;

    if let Some(url) = cli.api_url.as_deref() {
        config.api.set_base_url(url)?;
    }
    if let Some(dir) = cli.state_dir {
        config.storage.state_dir = dir;
    }

    telemetry::init(&config.telemetry)?;

    let client = ApiClient::from_config(&config.api)?;
    let session = SessionGate::init(FileStorage::new(config.storage.state_dir.clone()))?;
    info!(?config.environment, api = %client.base_url(), "client ready");

    let mut app = App {
        config,
        client,
        session,
    };
    let mut out = io::stdout().lock();

    match cli.command {
        Command::Login(args) => run_login(&mut app, args, &mut out).await,
        Command::Logout => {
            app.session.logout()?;
            writeln!(out, "Disconnesso.")?;
            Ok(())
        }
        Command::Whoami => Ok(views::identity(&mut out, app.session.current())?),
        Command::Valuta(args) => run_valuta(&app, args, &mut out).await,
        Command::Dashboard(args) => run_dashboard(&app, args, &mut out).await,
        Command::Utenti { command } => run_utenti(&app, command, &mut out).await,
        Command::Contratti(args) => run_contratti(&app, args, &mut out).await,
        Command::Valutazioni { command } => run_valutazioni(&app, command, &mut out).await,
        Command::Incarichi { command } => run_incarichi(&app, command, &mut out).await,
        Command::Indirizzo {
            command: IndirizzoCommand::Verify { via, citta },
        } => {
            let response = app
                .client
                .validate_address(&AddressValidationRequest { via, citta })
                .await?;
            if response.valid {
                writeln!(out, "Indirizzo valido.")?;
            } else {
                writeln!(out, "Indirizzo non riconosciuto.")?;
            }
            for suggestion in response.suggestions {
                writeln!(out, "  forse: {suggestion}")?;
            }
            Ok(())
        }
    }
}

async fn run_login<W: Write>(app: &mut App, args: LoginArgs, out: &mut W) -> Result<(), AppError> {
    let password = match args.password {
        Some(password) => password,
        None => {
            write!(out, "Password: ")?;
            out.flush()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    let identity = authenticate(&app.client, &args.email, &password).await?;
    app.session.login(identity)?;
    write!(out, "Accesso effettuato: ")?;
    views::identity(out, app.session.current())?;
    Ok(())
}

async fn run_valuta<W: Write>(app: &App, args: ValutaArgs, out: &mut W) -> Result<(), AppError> {
    let mut flow = IntakeFlow::new();

    if let Some(path) = args.answers {
        let raw = std::fs::read_to_string(&path)?;
        let answers: FormAnswers =
            serde_json::from_str(&raw).map_err(|source| AppError::Answers { path, source })?;
        wizard::run_scripted(&mut flow, answers)?;
        let receipt = flow.submit(&app.client).await?;
        views::receipt(out, &receipt)?;
        return Ok(());
    }

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), &mut *out);
    let address_check = args.verifica_indirizzo.then_some(&app.client);
    match wizard::run_interactive(&mut flow, &mut prompter, address_check).await? {
        WizardOutcome::Abandoned => {
            writeln!(prompter.output(), "\nRichiesta annullata.")?;
        }
        WizardOutcome::Ready => {
            match wizard::submit_with_retry(&mut flow, &app.client, &mut prompter).await? {
                Some(receipt) => views::receipt(prompter.output(), &receipt)?,
                None => writeln!(prompter.output(), "Richiesta non inviata.")?,
            }
        }
    }
    Ok(())
}

async fn run_dashboard<W: Write>(
    app: &App,
    args: DashboardArgs,
    out: &mut W,
) -> Result<(), AppError> {
    let identity = app.authorize(args.kind.required_role())?;
    let mut feed = DashboardFeed::new(&app.client, args.kind.kind(), app.config.api.page_size);
    for _ in 0..args.pages.max(1) {
        if feed.load_more().await?.is_none() {
            break;
        }
    }

    writeln!(out, "Benvenuto, {}", identity.name)?;
    if let Some(stats) = feed.statistics() {
        views::statistics(out, stats)?;
    }
    writeln!(out)?;
    views::immobili(out, feed.immobili())?;
    if feed.has_more() {
        writeln!(
            out,
            "Altri immobili disponibili (--pages {}).",
            next_page_count(args.pages)
        )?;
    }
    Ok(())
}

/// Page count to suggest after `pages` left more listings unread.
fn next_page_count(pages: u32) -> u32 {
    pages.max(1).saturating_add(1)
}

async fn run_utenti<W: Write>(
    app: &App,
    command: UtentiCommand,
    out: &mut W,
) -> Result<(), AppError> {
    app.authorize(Role::Admin)?;
    match command {
        UtentiCommand::List => views::users(out, &app.client.users().await?)?,
        UtentiCommand::Register {
            name,
            email,
            password,
            role,
        } => {
            let request = RegisterUserRequest {
                name,
                email,
                password,
                role: role.into(),
            };
            let user = app.client.register_user(&request).await?;
            writeln!(out, "Utente registrato:")?;
            views::users(out, std::slice::from_ref(&user))?;
        }
        UtentiCommand::Update {
            id,
            name,
            email,
            password,
            role,
        } => {
            let request = UpdateUserRequest {
                name,
                email,
                password,
                role: role.map(UserRole::from),
            };
            let user = app.client.update_user(id, &request).await?;
            writeln!(out, "Utente aggiornato:")?;
            views::users(out, std::slice::from_ref(&user))?;
        }
    }
    Ok(())
}

async fn run_contratti<W: Write>(app: &App, args: PageArgs, out: &mut W) -> Result<(), AppError> {
    let page = app.page(&args);
    let contracts = if app.authorize(Role::Admin).is_ok() {
        app.client.closed_contracts(page).await?
    } else {
        let identity = app.authorize(Role::Agent)?;
        app.client.agent_closed_contracts(&identity.id, page).await?
    };
    views::contracts(out, &contracts)?;
    Ok(())
}

async fn run_valutazioni<W: Write>(
    app: &App,
    command: ValutazioniCommand,
    out: &mut W,
) -> Result<(), AppError> {
    app.authorize(Role::Admin)?;
    match command {
        ValutazioniCommand::List { kind } => {
            let items = app.client.valutazioni(kind.into()).await?;
            views::valutazioni(out, &items)?;
        }
        ValutazioniCommand::Delete { kind, id } => {
            app.client.delete_valutazione(kind.into(), id).await?;
            writeln!(out, "Valutazione #{id} eliminata.")?;
        }
    }
    Ok(())
}

async fn run_incarichi<W: Write>(
    app: &App,
    command: IncarichiCommand,
    out: &mut W,
) -> Result<(), AppError> {
    let identity = app.authorize(Role::Agent)?;
    match command {
        IncarichiCommand::List => {
            let items = app.client.incarichi(&identity.id).await?;
            views::incarichi(out, &items)?;
        }
        IncarichiCommand::Take { valutazione_id } => {
            let request = TakeAssignmentRequest {
                agente_id: identity.id.clone(),
                agente_nome: identity.name.clone(),
            };
            let incarico = app.client.take_incarico(valutazione_id, &request).await?;
            writeln!(out, "Incarico preso in carico:")?;
            views::incarichi(out, std::slice::from_ref(&incarico))?;
        }
    }
    Ok(())
}
