//! Demo seeder for Rota.
//!
//! Registers a small team, rosters two shifts, then drives one leave request
//! and one shift swap through their full approval workflows. Safe to run
//! repeatedly: existing users are reused.
//!
//! Usage: cargo run --bin seeder
//! (reads `ROTA__DATABASE__URL`, see `AppConfig`)

use std::sync::Arc;

use anyhow::Context;
use chrono::{Days, Utc};
use sea_orm_migration::MigratorTrait;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use rota_core::access::{Principal, Role};
use rota_core::model::{LeaveRequestInput, NewUser, ShiftAssignment, SwapProposal};
use rota_core::notify::BroadcastSink;
use rota_core::Services;
use rota_core::store::{EntityStore, UserFilter};
use rota_db::SeaOrmStore;
use rota_db::migration::Migrator;
use rota_shared::{AppConfig, AppResult};
use rota_shared::config::LoggingConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    let db = rota_db::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    Migrator::up(&db, None)
        .await
        .context("failed to apply migrations")?;
    info!("Connected to database, schema up to date");

    let store: Arc<dyn EntityStore> = Arc::new(SeaOrmStore::new(db));
    let sink = Arc::new(BroadcastSink::from_config(&config.notifications));
    let mut events = sink.subscribe();
    let services = Services::new(Arc::clone(&store), sink);

    let team = [
        ("Alice Employee", "alice@rota.dev", Role::Employee),
        ("Bob Employee", "bob@rota.dev", Role::Employee),
        ("Lee Lead", "lee@rota.dev", Role::TeamLead),
        ("Mona Manager", "mona@rota.dev", Role::Manager),
    ];
    let mut principals = Vec::with_capacity(team.len());
    for (name, email, role) in team {
        principals.push(ensure_user(&services, store.as_ref(), name, email, role).await?);
    }
    let [alice, bob, lead, manager] = principals[..] else {
        anyhow::bail!("expected four seeded users");
    };

    let seeded = async {
        seed_leave(&services, alice, lead, manager).await?;
        seed_swap(&services, alice, bob, manager).await
    }
    .await;
    if let Err(err) = seeded {
        tracing::error!(
            code = err.error_code(),
            status = err.status_code(),
            error = %err,
            "seeding workflow failed"
        );
        return Err(err.into());
    }

    while let Ok(event) = events.try_recv() {
        info!(event = event.name(), "notification delivered");
    }
    info!("Seeding complete");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Registers the user, or reuses the one already holding `email`.
async fn ensure_user(
    services: &Services,
    store: &dyn EntityStore,
    name: &str,
    email: &str,
    role: Role,
) -> anyhow::Result<Principal> {
    let existing = store
        .find_users(&UserFilter {
            email: Some(email.to_string()),
        })
        .await?;
    if let Some(user) = existing.into_iter().next() {
        info!(email, "user already exists, skipping");
        return Ok(Principal::new(user.id, user.role));
    }

    let user = services
        .users
        .register(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            role,
        })
        .await?;
    Ok(Principal::new(user.id, user.role))
}

async fn seed_leave(
    services: &Services,
    employee: Principal,
    lead: Principal,
    manager: Principal,
) -> AppResult<()> {
    let start = Utc::now().date_naive() + Days::new(14);
    let leave = services
        .leave
        .request_leave(
            &employee,
            LeaveRequestInput {
                start_date: Some(start),
                end_date: Some(start + Days::new(2)),
                reason: Some("Family visit".to_string()),
            },
        )
        .await?;
    services.leave.approve_by_team_lead(&lead, leave.id).await?;
    let leave = services.leave.approve_by_manager(&manager, leave.id).await?;
    info!(leave_id = %leave.id, status = %leave.status, "Seeded leave request");
    Ok(())
}

async fn seed_swap(
    services: &Services,
    initiator: Principal,
    peer: Principal,
    manager: Principal,
) -> AppResult<()> {
    let day = Utc::now().date_naive() + Days::new(7);
    let mine = services
        .shifts
        .assign_shift(
            &manager,
            ShiftAssignment {
                user_id: Some(initiator.id),
                date: Some(day),
            },
        )
        .await?;
    let theirs = services
        .shifts
        .assign_shift(
            &manager,
            ShiftAssignment {
                user_id: Some(peer.id),
                date: Some(day + Days::new(1)),
            },
        )
        .await?;

    let swap = services
        .swaps
        .propose(
            &initiator,
            SwapProposal {
                target_user_id: Some(peer.id),
                my_shift_id: Some(mine.id),
                target_shift_id: Some(theirs.id),
            },
        )
        .await?;
    services.swaps.accept_by_peer(&peer, swap.id).await?;
    let swap = services.swaps.approve_by_manager(&manager, swap.id).await?;
    info!(swap_id = %swap.id, status = %swap.status, "Seeded shift swap");
    Ok(())
}
