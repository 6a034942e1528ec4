use std::time::Duration;

use anyhow::{Context, Result};
use time::OffsetDateTime;

use shoplist::engine::{Engine, ListStatus, LoadState};
use shoplist::items::days_since_deletion;
use shoplist::model::{Item, ItemDraft, ItemId};
use shoplist::remote::{AuthError, LOGIN_FALLBACK, REGISTER_FALLBACK, Registration};
use shoplist::session::{AuthState, SessionGate, Theme};
use shoplist::store::LocalStore;

use crate::cli_runtime::build_config;
use crate::{Commands, GlobalOpts};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const ECHO_TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) async fn handle_command(opts: &GlobalOpts, command: Commands) -> Result<()> {
    match command {
        Commands::Theme { theme } => handle_theme(opts, theme),
        Commands::Login { email, password } => {
            let mut engine = open_engine(opts)?;
            engine
                .login(&email, &password)
                .await
                .map_err(|err| auth_failure(err, LOGIN_FALLBACK))?;
            wait_for_list(&mut engine).await?;
            println!("Logged in ({} items)", engine.active_items().len());
            Ok(())
        }
        Commands::Register {
            email,
            password,
            password_confirm,
            accept_terms,
        } => {
            let engine = open_engine(opts)?;
            let form = Registration {
                email,
                password,
                password_confirm,
                accepted_terms: accept_terms,
            };
            let msg = engine
                .register(&form)
                .await
                .map_err(|err| auth_failure(err, REGISTER_FALLBACK))?;
            println!("{}", msg);
            Ok(())
        }
        Commands::Logoff => {
            let mut engine = open_engine(opts)?;
            engine.logoff().await?;
            println!("Logged off");
            Ok(())
        }
        Commands::List { trash, json } => {
            let engine = connect(opts).await?;
            print_list(&engine, trash, json)
        }
        Commands::Watch { trash, json } => watch(opts, trash, json).await,
        Commands::Add {
            name,
            description,
            count,
            image,
        } => {
            let mut draft = ItemDraft::new(name, description, count);
            if let Some(path) = image {
                draft = draft.with_image_file(&path)?;
            }
            draft.validate()?;
            let mut engine = connect(opts).await?;
            let before = engine.revision();
            ensure_sent(engine.request_add(draft))?;
            settle(&mut engine, |e| e.revision() > before).await;
            print_list(&engine, false, false)
        }
        Commands::Edit {
            id,
            name,
            description,
            count,
            image,
        } => {
            let mut engine = connect(opts).await?;
            let id = resolve_id(&engine, &id)?;
            let Some(current) = engine.items().get(&id) else {
                anyhow::bail!("item {} not found", id);
            };
            let mut item = current.clone();
            let mut draft = ItemDraft::from(&item);
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(count) = count {
                draft.count = count;
            }
            if let Some(path) = image {
                draft = draft.with_image_file(&path)?;
            }
            draft.validate()?;
            draft.apply_to(&mut item);

            let before = engine.revision();
            ensure_sent(engine.request_update(&item))?;
            settle(&mut engine, |e| e.revision() > before).await;
            print_list(&engine, false, false)
        }
        Commands::Trash { id } => {
            let mut engine = connect(opts).await?;
            let id = resolve_id(&engine, &id)?;
            ensure_sent(engine.request_trash(&id))?;
            // Trashing is applied locally first; wait for the echo on top of that.
            let before = engine.revision();
            settle(&mut engine, |e| e.revision() > before).await;
            print_list(&engine, true, false)
        }
        Commands::Restore { id } => {
            let mut engine = connect(opts).await?;
            let id = resolve_id(&engine, &id)?;
            ensure_sent(engine.request_restore(&id))?;
            let before = engine.revision();
            settle(&mut engine, |e| e.revision() > before).await;
            print_list(&engine, false, false)
        }
        Commands::Delete { id } => {
            let mut engine = connect(opts).await?;
            let id = resolve_id(&engine, &id)?;
            ensure_sent(engine.request_hard_delete(&id))?;
            settle(&mut engine, |e| !e.items().contains(&id)).await;
            print_list(&engine, true, false)
        }
    }
}

fn ensure_sent(sent: bool) -> Result<()> {
    if !sent {
        anyhow::bail!("channel closed before the change could be sent");
    }
    Ok(())
}

fn handle_theme(opts: &GlobalOpts, theme: Option<String>) -> Result<()> {
    let dir = match &opts.state_dir {
        Some(dir) => dir.clone(),
        None => shoplist::config::default_state_dir()?,
    };
    let store = LocalStore::open(&dir)?;
    let mut gate = SessionGate::new();
    gate.restore_preferences(&store);
    if let Some(theme) = theme {
        let theme: Theme = theme.parse()?;
        store.set_theme(theme).context("save theme")?;
        gate.set_theme(theme);
    }
    println!("{}", gate.theme());
    Ok(())
}

fn open_engine(opts: &GlobalOpts) -> Result<Engine> {
    let mut engine = Engine::new(build_config(opts)?)?;
    engine.restore_preferences();
    Ok(engine)
}

fn auth_failure(err: AuthError, fallback: &str) -> anyhow::Error {
    if let AuthError::Transport(inner) = &err {
        tracing::debug!("{:#}", inner);
    }
    anyhow::anyhow!(err.user_message(fallback))
}

/// Resumes the saved session and waits for the initial list.
async fn connect(opts: &GlobalOpts) -> Result<Engine> {
    let mut engine = open_engine(opts)?;
    if !engine.resume()? {
        anyhow::bail!("not logged in (run `shoplist login --email ...`)");
    }
    wait_for_list(&mut engine).await?;
    Ok(engine)
}

async fn wait_for_list(engine: &mut Engine) -> Result<()> {
    let ready = engine
        .pump_until(CONNECT_TIMEOUT, |e| {
            e.load_state() == LoadState::Loaded || e.auth_state() == AuthState::Unauthenticated
        })
        .await;
    if engine.auth_state() == AuthState::Unauthenticated {
        let reason = engine.last_error().unwrap_or("session rejected");
        anyhow::bail!("channel closed: {} (log in again)", reason);
    }
    if !ready {
        anyhow::bail!("timed out waiting for the item list");
    }
    Ok(())
}

/// Gives the authority a bounded window to echo a change back.
async fn settle<F>(engine: &mut Engine, done: F)
where
    F: FnMut(&Engine) -> bool,
{
    if !engine.pump_until(ECHO_TIMEOUT, done).await {
        eprintln!("warning: no confirmation from the server yet");
    }
}

async fn watch(opts: &GlobalOpts, trash: bool, json: bool) -> Result<()> {
    let mut engine = connect(opts).await?;
    print_list(&engine, trash, json)?;
    let mut seen = engine.revision();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(()),
            event = engine.next_event() => {
                let Some(event) = event else {
                    return Ok(());
                };
                engine.apply(event);
            }
        }
        if engine.auth_state() == AuthState::Unauthenticated {
            let reason = engine.last_error().unwrap_or("session ended");
            anyhow::bail!("channel closed: {}", reason);
        }
        if !engine.has_channel() {
            eprintln!("disconnected");
            return Ok(());
        }
        if engine.revision() != seen {
            seen = engine.revision();
            print_list(&engine, trash, json)?;
        }
    }
}

fn resolve_id(engine: &Engine, input: &str) -> Result<ItemId> {
    let exact = ItemId::from(input);
    if engine.items().contains(&exact) {
        return Ok(exact);
    }
    let matches: Vec<&Item> = engine
        .items()
        .iter()
        .filter(|i| i.id.as_str().starts_with(input))
        .collect();
    match matches.as_slice() {
        [one] => Ok(one.id.clone()),
        [] => anyhow::bail!("no item with id {}", input),
        _ => anyhow::bail!("id prefix {} is ambiguous ({} matches)", input, matches.len()),
    }
}

fn print_list(engine: &Engine, trash: bool, json: bool) -> Result<()> {
    let items = if trash {
        engine.trashed_items()
    } else {
        engine.active_items()
    };
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&items).context("serialize items json")?
        );
        return Ok(());
    }

    if trash {
        if items.is_empty() {
            println!("Nothing Trashed...");
        }
        let now = OffsetDateTime::now_utc();
        for item in items {
            println!(
                "{}  {} x{}  (trashed {} days ago)",
                short_id(&item.id),
                item.name,
                item.count,
                days_since_deletion(item, now)
            );
        }
        return Ok(());
    }

    match engine.list_status() {
        ListStatus::Loading => println!("Loading Data..."),
        ListStatus::LoadedEmpty => println!("No Items..."),
        ListStatus::Loaded(_) => {
            for item in items {
                println!(
                    "{}  {} x{}  {}",
                    short_id(&item.id),
                    item.name,
                    item.count,
                    item.description
                );
            }
        }
    }
    Ok(())
}

fn short_id(id: &ItemId) -> String {
    id.as_str().chars().take(8).collect()
}

#[cfg(test)]
#[path = "tests/cli_exec_tests.rs"]
mod tests;
