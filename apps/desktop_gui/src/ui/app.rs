use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use client_core::PurchaseOutcome;
use shared::error::FailureKind;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

/// Success banners auto-hide after this delay; error banners stay until
/// dismissed.
const SUCCESS_BANNER_SECS: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BannerTone {
    Success,
    RateLimited,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
struct ResponseBanner {
    tone: BannerTone,
    message: String,
    expires_at: Option<f64>,
}

impl ResponseBanner {
    fn from_outcome(outcome: &PurchaseOutcome, now: f64) -> Self {
        match outcome {
            PurchaseOutcome::Fulfilled { message, .. } => Self {
                tone: BannerTone::Success,
                message: message.clone(),
                expires_at: Some(now + SUCCESS_BANNER_SECS),
            },
            PurchaseOutcome::Rejected { kind, error, .. } => Self {
                tone: if *kind == FailureKind::RateLimited {
                    BannerTone::RateLimited
                } else {
                    BannerTone::Error
                },
                message: error.clone(),
                expires_at: None,
            },
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            tone: BannerTone::Error,
            message: message.into(),
            expires_at: None,
        }
    }

    fn expired(&self, now: f64) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

fn banner_palette(tone: BannerTone) -> (egui::Color32, egui::Color32) {
    match tone {
        BannerTone::Success => (
            egui::Color32::from_rgb(38, 92, 56),
            egui::Color32::from_rgb(96, 175, 121),
        ),
        BannerTone::RateLimited => (
            egui::Color32::from_rgb(112, 84, 27),
            egui::Color32::from_rgb(175, 143, 66),
        ),
        BannerTone::Error => (
            egui::Color32::from_rgb(111, 53, 53),
            egui::Color32::from_rgb(175, 96, 96),
        ),
    }
}

pub struct StorefrontApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    worker_ready: bool,
    purchasing: bool,
    banner: Option<ResponseBanner>,
    purchase_count: u32,
    status: String,
}

impl StorefrontApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            worker_ready: false,
            purchasing: false,
            banner: None,
            purchase_count: 0,
            status: "Backend worker starting...".to_string(),
        }
    }

    fn process_ui_events(&mut self, now: f64) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::WorkerReady => {
                    self.worker_ready = true;
                    self.status = "Ready".to_string();
                }
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::PurchaseStarted => {
                    self.purchasing = true;
                    self.status = "Purchasing...".to_string();
                }
                UiEvent::PurchaseSettled {
                    outcome,
                    fulfilled_count,
                } => {
                    self.purchasing = false;
                    self.purchase_count = fulfilled_count;
                    self.status = if outcome.is_fulfilled() {
                        "Purchase complete".to_string()
                    } else {
                        "Purchase failed".to_string()
                    };
                    // Replacing the banner also drops any pending auto-hide
                    // deadline from the previous outcome.
                    self.banner = Some(ResponseBanner::from_outcome(&outcome, now));
                }
                UiEvent::Error(err) => {
                    self.purchasing = false;
                    if err.context() == UiErrorContext::WorkerStartup {
                        // The worker never came up; keep the buy button off.
                        self.worker_ready = false;
                    }
                    self.status = format!("{} error: {}", err_label(err.category()), err.message());
                    self.banner = Some(ResponseBanner::error(err.message()));
                }
            }
        }
    }

    fn expire_banner_if_due(&mut self, now: f64) {
        if self.banner.as_ref().is_some_and(|banner| banner.expired(now)) {
            self.banner = None;
        }
    }

    fn trigger_purchase(&mut self) {
        dispatch_backend_command(&self.cmd_tx, BackendCommand::PurchaseCorn, &mut self.status);
    }

    fn show_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = self.banner.clone() else {
            return;
        };
        let (fill, stroke) = banner_palette(banner.tone);

        egui::Frame::group(ui.style())
            .fill(fill)
            .stroke(egui::Stroke::new(1.0, stroke))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Dismiss").clicked() {
                            self.banner = None;
                        }
                    });
                });
            });
    }
}

impl eframe::App for StorefrontApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);
        self.process_ui_events(now);
        self.expire_banner_if_due(now);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(18.0);
            ui.vertical_centered(|ui| {
                ui.set_width(ui.available_width().clamp(300.0, 380.0));

                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("🌽").size(24.0));
                    ui.vertical(|ui| {
                        ui.heading("Bob's Corn");
                        ui.weak("Fresh corn available!");
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if self.purchase_count > 0 {
                            ui.label(
                                egui::RichText::new(format!("🛒 {} purchased", self.purchase_count))
                                    .color(egui::Color32::from_rgb(96, 175, 121)),
                            );
                        }
                    });
                });

                ui.add_space(10.0);

                let label = if self.purchasing {
                    "Purchasing..."
                } else {
                    "Buy Bob's Corn 🌽"
                };
                let buy_button = egui::Button::new(
                    egui::RichText::new(label)
                        .strong()
                        .size(16.0)
                        .color(egui::Color32::WHITE),
                )
                .fill(egui::Color32::from_rgb(202, 138, 4))
                .min_size(egui::vec2(ui.available_width(), 40.0));

                if ui
                    .add_enabled(!self.purchasing && self.worker_ready, buy_button)
                    .clicked()
                {
                    self.trigger_purchase();
                }

                if self.purchasing {
                    ui.add_space(6.0);
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.weak("Talking to the farm...");
                    });
                }

                ui.add_space(10.0);
                self.show_banner(ui);

                ui.add_space(10.0);
                ui.separator();
                ui.horizontal_wrapped(|ui| {
                    ui.small("Status:");
                    ui.small(egui::RichText::new(&self.status).weak());
                });
            });
        });

        // Keep repainting so worker events drain and the auto-hide deadline
        // fires without user interaction.
        let needs_tick = self.purchasing
            || self
                .banner
                .as_ref()
                .is_some_and(|banner| banner.expires_at.is_some());
        ctx.request_repaint_after(std::time::Duration::from_millis(if needs_tick {
            100
        } else {
            250
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::events::{UiError, UiErrorContext};
    use client_core::FARM_UNREACHABLE_MESSAGE;
    use crossbeam_channel::bounded;

    fn app_with_events(events: Vec<UiEvent>) -> StorefrontApp {
        let (cmd_tx, _cmd_rx) = bounded::<BackendCommand>(4);
        let (ui_tx, ui_rx) = bounded::<UiEvent>(16);
        for event in events {
            ui_tx.try_send(event).expect("queue event");
        }
        StorefrontApp::new(cmd_tx, ui_rx)
    }

    fn fulfilled() -> PurchaseOutcome {
        PurchaseOutcome::Fulfilled {
            message: "🌽 Corn successfully purchased!".to_string(),
            status: 200,
        }
    }

    #[test]
    fn success_banner_auto_hides_after_delay() {
        let banner = ResponseBanner::from_outcome(&fulfilled(), 10.0);
        assert_eq!(banner.tone, BannerTone::Success);
        assert_eq!(banner.expires_at, Some(13.0));
        assert!(!banner.expired(12.9));
        assert!(banner.expired(13.0));
    }

    #[test]
    fn failure_banners_never_auto_hide() {
        let outcome = PurchaseOutcome::Rejected {
            kind: FailureKind::Transport,
            error: FARM_UNREACHABLE_MESSAGE.to_string(),
            status: Some(500),
        };
        let banner = ResponseBanner::from_outcome(&outcome, 10.0);
        assert_eq!(banner.tone, BannerTone::Error);
        assert_eq!(banner.expires_at, None);
        assert!(!banner.expired(1_000_000.0));
    }

    #[test]
    fn rate_limited_outcomes_get_their_own_tone() {
        let outcome = PurchaseOutcome::Rejected {
            kind: FailureKind::RateLimited,
            error: "Too Many Requests. Please wait a minute.".to_string(),
            status: Some(429),
        };
        let banner = ResponseBanner::from_outcome(&outcome, 0.0);
        assert_eq!(banner.tone, BannerTone::RateLimited);
    }

    #[test]
    fn purchase_lifecycle_events_drive_spinner_and_counter() {
        let mut app = app_with_events(vec![
            UiEvent::WorkerReady,
            UiEvent::PurchaseStarted,
            UiEvent::PurchaseSettled {
                outcome: fulfilled(),
                fulfilled_count: 1,
            },
        ]);

        app.process_ui_events(5.0);

        assert!(app.worker_ready);
        assert!(!app.purchasing, "settled event must clear the spinner");
        assert_eq!(app.purchase_count, 1);
        let banner = app.banner.expect("banner");
        assert_eq!(banner.tone, BannerTone::Success);
        assert_eq!(banner.expires_at, Some(5.0 + SUCCESS_BANNER_SECS));
    }

    #[test]
    fn newer_outcome_replaces_banner_and_its_deadline() {
        let mut app = app_with_events(vec![
            UiEvent::PurchaseSettled {
                outcome: fulfilled(),
                fulfilled_count: 1,
            },
            UiEvent::PurchaseSettled {
                outcome: PurchaseOutcome::Rejected {
                    kind: FailureKind::RateLimited,
                    error: "Too Many Requests. Please wait a minute.".to_string(),
                    status: Some(429),
                },
                fulfilled_count: 1,
            },
        ]);

        app.process_ui_events(5.0);

        // The stale success deadline must not hide the rate-limit notice.
        let banner = app.banner.as_ref().expect("banner");
        assert_eq!(banner.tone, BannerTone::RateLimited);
        assert_eq!(banner.expires_at, None);
        app.expire_banner_if_due(100.0);
        assert!(app.banner.is_some());
    }

    #[test]
    fn expired_success_banner_is_cleared() {
        let mut app = app_with_events(vec![UiEvent::PurchaseSettled {
            outcome: fulfilled(),
            fulfilled_count: 1,
        }]);

        app.process_ui_events(5.0);
        app.expire_banner_if_due(7.0);
        assert!(app.banner.is_some());
        app.expire_banner_if_due(8.1);
        assert!(app.banner.is_none());
    }

    #[test]
    fn worker_errors_clear_spinner_and_show_error_banner() {
        let mut app = app_with_events(vec![
            UiEvent::PurchaseStarted,
            UiEvent::Error(UiError::from_message(
                UiErrorContext::WorkerStartup,
                "backend worker startup failure: failed to build runtime: boom",
            )),
        ]);

        app.process_ui_events(0.0);

        assert!(!app.purchasing);
        assert!(!app.worker_ready, "a dead worker must keep the buy button off");
        let banner = app.banner.expect("banner");
        assert_eq!(banner.tone, BannerTone::Error);
        assert!(app.status.starts_with("Startup error:"), "status: {}", app.status);
    }
}
