use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Orbit, Rocket};
use tokio::sync::watch;

/// Pairs a fairing that publishes the bound port at liftoff with a handle to read it.
///
/// The server is usually configured with port 0, so the real port is only
/// known once Rocket has bound its listener.
pub fn create_pair() -> (PortSaver, Port) {
    let (tx, rx) = watch::channel(None);
    (PortSaver { tx }, Port { rx })
}

#[derive(Clone)]
pub struct Port {
    rx: watch::Receiver<Option<u16>>,
}

impl Port {
    /// Waits for liftoff. `None` if the server was dropped before binding.
    pub async fn get(&mut self) -> Option<u16> {
        loop {
            if let Some(port) = *self.rx.borrow() {
                return Some(port);
            }
            if self.rx.changed().await.is_err() {
                return *self.rx.borrow();
            }
        }
    }
}

pub struct PortSaver {
    tx: watch::Sender<Option<u16>>,
}

#[rocket::async_trait]
impl Fairing for PortSaver {
    fn info(&self) -> Info {
        Info {
            name: "Port Saver",
            kind: Kind::Liftoff,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let port = rocket.config().port;
        tracing::info!(port, "Server bound");
        // Nobody may be waiting, which is fine.
        let _ = self.tx.send(Some(port));
    }
}
