use medcare_hms::{
    ClientState, HmsApp,
    auth::{AuthApiState, BearerAttachment, HttpAuthApi, MockAuthApi},
    config::{ClientConfig, Env},
    models::{Identity, RegisterRequest, Role},
    notify::{ToastLevel, ToastQueue},
    router::Section,
    session::{SessionStatus, demo_credentials},
    storage::{FileTokenStore, TokenStoreState},
    views::{ContentViews, render_text},
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

const HELP: &str = "\
Commands:
  login <email> <password>                          sign in with credentials
  demo <admin|doctor|nurse|patient>                 sign in with a demo account
  register <role> <email> <password> <full name...> create an account
  go <section>                                      open a section by id
                                                    (dashboard, patients, appointments,
                                                    billing, ai-docs)
  whoami                                            show the signed-in identity
  logout                                            end the session
  help                                              show this help
  quit | exit                                       leave the shell

Flags:
  --offline   use a built-in backend seeded with the demo accounts";

/// main
///
/// Entry point of the terminal shell: configuration, logging, client state,
/// session restore, then the interactive loop.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    dotenv::dotenv().ok();
    let config = ClientConfig::load();

    // 2. Logging. Written to stderr so it never interleaves with the rendered screen.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "medcare_hms=debug,reqwest=info".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }

    let offline = std::env::args().skip(1).any(|arg| arg == "--offline");
    if std::env::args().skip(1).any(|arg| arg == "-h" || arg == "--help") {
        println!("{HELP}");
        return;
    }

    tracing::info!(
        "Client starting in {:?} mode against {}",
        config.env,
        if offline { "the offline backend".to_string() } else { config.api_base() }
    );

    // 3. Client State Assembly
    let bearer = BearerAttachment::new();
    let api: AuthApiState = if offline {
        Arc::new(offline_backend(bearer.clone()))
    } else {
        match HttpAuthApi::new(&config, bearer.clone()) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                eprintln!("FATAL: could not build HTTP client: {e}");
                std::process::exit(1);
            }
        }
    };
    let tokens: TokenStoreState = Arc::new(FileTokenStore::new(config.token_path.clone()));
    let toasts = ToastQueue::new();

    let state = ClientState {
        api,
        tokens,
        notifier: Arc::new(toasts.clone()),
        bearer,
    };

    // 4. Session Restore. Only the loading view is shown until it resolves.
    let views = ContentViews::default();
    let mut app = HmsApp::new(&state);
    print!("{}", render_text(&app.screen(), &views));
    app.boot().await;
    show(&app, &views, &toasts);

    // 5. Interactive Loop
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read from stdin");
                break;
            }
        };

        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = words.split_first() else {
            continue;
        };

        match command {
            "quit" | "exit" => break,
            "help" => {
                println!("{HELP}");
                continue;
            }
            _ => {}
        }

        if let Err(message) = dispatch(&mut app, command, args).await {
            println!("{message}");
        }
        show(&app, &views, &toasts);
    }
}

/// dispatch
///
/// Runs one shell command. Commands that do not apply to the current state are
/// refused with a hint instead of being forwarded to the core.
async fn dispatch(app: &mut HmsApp, command: &str, args: &[&str]) -> Result<(), String> {
    let authenticated = matches!(app.status(), SessionStatus::Authenticated(_));

    match (command, authenticated) {
        ("login", false) => match args {
            [email, password] => {
                // Failures are reported through the toast queue.
                let _ = app.sign_in(email, password).await;
                Ok(())
            }
            _ => Err("usage: login <email> <password>".to_string()),
        },
        ("demo", false) => {
            let role = args
                .first()
                .ok_or("usage: demo <admin|doctor|nurse|patient>")?
                .parse::<Role>()?;
            let _ = app.demo_sign_in(role).await;
            Ok(())
        }
        ("register", false) => match args {
            [role, email, password, name @ ..] if !name.is_empty() => {
                let request = RegisterRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                    full_name: name.join(" "),
                    role: role.parse()?,
                    phone: None,
                };
                let _ = app.register(&request).await;
                Ok(())
            }
            _ => Err("usage: register <role> <email> <password> <full name...>".to_string()),
        },
        ("go", true) => {
            let section = args
                .first()
                .ok_or("usage: go <section>")?
                .parse::<Section>()?;
            app.set_active_section(section);
            Ok(())
        }
        ("logout", true) => {
            app.logout().await;
            Ok(())
        }
        ("whoami", _) => {
            match app.identity() {
                Some(identity) => println!(
                    "{} <{}> role={} id={}",
                    identity.full_name, identity.email, identity.role, identity.id
                ),
                None => println!("not signed in"),
            }
            Ok(())
        }
        ("login" | "demo" | "register", true) => {
            Err("already signed in; logout first".to_string())
        }
        ("go" | "logout", false) => Err("not signed in".to_string()),
        _ => Err(format!("unknown command '{command}', try 'help'")),
    }
}

/// Prints pending toasts followed by the current screen.
fn show(app: &HmsApp, views: &ContentViews, toasts: &ToastQueue) {
    for toast in toasts.drain() {
        let tag = match toast.level {
            ToastLevel::Success => "ok",
            ToastLevel::Error => "error",
        };
        println!("[{tag}] {}", toast.message);
    }
    print!("{}", render_text(&app.screen(), views));
}

/// offline_backend
///
/// An in-process backend holding the four demo accounts, for trying the shell
/// without a server.
fn offline_backend(bearer: BearerAttachment) -> MockAuthApi {
    let names = [
        (Role::Admin, "Admin User"),
        (Role::Doctor, "Dr. Sarah Johnson"),
        (Role::Nurse, "Nurse Emily Davis"),
        (Role::Patient, "John Smith"),
    ];

    names
        .into_iter()
        .fold(MockAuthApi::new(bearer), |api, (role, full_name)| {
            let credentials = demo_credentials(role);
            api.with_account(
                &credentials.password,
                Identity {
                    id: Uuid::new_v4(),
                    email: credentials.email,
                    full_name: full_name.to_string(),
                    role,
                    phone: None,
                    created_at: None,
                },
            )
        })
}
