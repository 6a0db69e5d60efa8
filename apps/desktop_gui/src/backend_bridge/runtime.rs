//! Runtime bridge between the UI command queue and the purchase worker.
//!
//! The worker thread owns the tokio runtime and the purchase controller; it
//! is the only mutator of the purchase session. The UI observes it purely
//! through `UiEvent`s.

use std::thread;

use client_core::{FarmSettings, PurchaseClient, PurchaseController};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: FarmSettings) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::WorkerStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = match PurchaseClient::from_settings(&settings) {
                Ok(client) => client,
                Err(err) => {
                    // The worker keeps running; purchases resolve to the
                    // configuration outcome until the endpoint is fixed.
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::General,
                        format!("invalid farm endpoint configuration: {err}"),
                    )));
                    tracing::warn!("invalid farm endpoint configuration, continuing unconfigured: {err}");
                    PurchaseClient::new(None)
                }
            };
            if !client.is_configured() {
                tracing::warn!(
                    "no farm endpoint configured; purchases will fail until CORN_FARM_URL is set"
                );
            }

            let mut controller = PurchaseController::new(client);
            let _ = ui_tx.try_send(UiEvent::WorkerReady);

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::PurchaseCorn => {
                        tracing::info!("backend: purchase_corn");
                        let _ = ui_tx.try_send(UiEvent::PurchaseStarted);
                        controller.purchase_corn().await;
                        if let Some(outcome) = controller.last_outcome() {
                            let _ = ui_tx.try_send(UiEvent::PurchaseSettled {
                                outcome: outcome.clone(),
                                fulfilled_count: controller.fulfilled_count(),
                            });
                        }
                    }
                }
            }
        });
    });
}
