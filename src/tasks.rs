use rocket::fairing::{Fairing, Info, Kind};
use rocket::tokio;
use rocket::{Orbit, Rocket};
use std::sync::Arc;
use std::time::Duration;

use crate::session::SessionStore;

const SWEEP_INTERVAL_MINUTES: u64 = 5;

pub struct BackgroundTasks;

#[rocket::async_trait]
impl Fairing for BackgroundTasks {
    fn info(&self) -> Info {
        Info {
            name: "Background Tasks",
            kind: Kind::Liftoff,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let Some(sessions) = rocket.state::<Arc<SessionStore>>() else {
            log::error!("[task] Session store not in managed state, sweeper not started");
            return;
        };

        // Idle session sweep
        let s = Arc::clone(sessions);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(SWEEP_INTERVAL_MINUTES * 60)).await;
                let count = s.sweep();
                if count > 0 {
                    log::info!("[task] Dropped {} idle sessions", count);
                }
            }
        });

        log::info!(
            "[task] Background tasks started (session sweep every {}m)",
            SWEEP_INTERVAL_MINUTES
        );
    }
}
