use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use mdfp::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

struct PhaseBar {
    bar: ProgressBar,
    total_phases: usize,
    current_phase: usize,
    phase_name: &'static str,
}

impl PhaseBar {
    fn label(&self) -> String {
        format!(
            "[{}/{}] {}",
            self.current_phase, self.total_phases, self.phase_name
        )
    }
}

/// Renders composition progress on stderr, one spinner or bar per phase.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<PhaseBar>>,
}

impl CliProgressHandler {
    /// `total_phases` is the structural phase plus one per regime.
    pub fn new(total_phases: usize) -> Self {
        Self::with_draw_target(total_phases, ProgressDrawTarget::stderr())
    }

    fn with_draw_target(total_phases: usize, target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target)
            .with_style(Self::spinner_style())
            .with_message("Initializing...");
        bar.finish_and_clear();

        Self {
            state: Arc::new(Mutex::new(PhaseBar {
                bar,
                total_phases,
                current_phase: 0,
                phase_name: "",
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut phase) = state.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    phase.current_phase += 1;
                    phase.phase_name = name;
                    let label = phase.label();
                    let bar = &phase.bar;
                    bar.reset();
                    bar.set_length(0);
                    bar.set_style(Self::spinner_style());
                    bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    bar.set_message(label);
                }
                Progress::PhaseFinish => {
                    let label = phase.label();
                    phase.bar.disable_steady_tick();
                    phase.bar.finish_with_message(format!("✓ {}", label));
                }
                Progress::TaskStart { total_steps } => {
                    let bar = &phase.bar;
                    bar.disable_steady_tick();
                    bar.reset();
                    bar.set_length(total_steps);
                    bar.set_position(0);
                    bar.set_style(Self::bar_style());
                }
                Progress::TaskIncrement => phase.bar.inc(1),
                Progress::TaskFinish => {
                    let bar = &phase.bar;
                    let length = bar.length().unwrap_or(0);
                    if bar.position() < length {
                        bar.set_position(length);
                    }
                }
                Progress::Message(msg) => {
                    if phase.bar.is_finished() {
                        phase.bar.set_message(msg);
                    } else {
                        phase.bar.println(format!("  {}", msg));
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<32} [{bar:30.cyan/blue}] {pos}/{len} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key(
                "elapsed",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.elapsed().as_secs_f64());
                },
            )
            .progress_chars("##-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn hidden_handler(total_phases: usize) -> CliProgressHandler {
        CliProgressHandler::with_draw_target(total_phases, ProgressDrawTarget::hidden())
    }

    #[test]
    fn handler_initializes_in_a_clean_state() {
        let handler = hidden_handler(3);
        let phase = handler.state.lock().unwrap();
        assert_eq!(phase.bar.length(), Some(0));
        assert!(phase.bar.is_finished());
        assert_eq!(phase.current_phase, 0);
    }

    #[test]
    fn callback_tracks_phases_and_tasks() {
        let handler = hidden_handler(2);
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: "Structural Descriptors",
        });
        {
            let phase = handler.state.lock().unwrap();
            assert_eq!(phase.bar.message(), "[1/2] Structural Descriptors");
            assert!(!phase.bar.is_finished());
        }
        callback(Progress::PhaseFinish);

        callback(Progress::PhaseStart {
            name: "Solution Properties",
        });
        callback(Progress::TaskStart { total_steps: 3 });
        callback(Progress::TaskIncrement);
        {
            let phase = handler.state.lock().unwrap();
            assert_eq!(phase.bar.length(), Some(3));
            assert_eq!(phase.bar.position(), 1);
        }

        callback(Progress::TaskFinish);
        assert_eq!(handler.state.lock().unwrap().bar.position(), 3);

        callback(Progress::PhaseFinish);
        let phase = handler.state.lock().unwrap();
        assert!(phase.bar.is_finished());
        assert_eq!(phase.bar.message(), "✓ [2/2] Solution Properties");
    }

    #[test]
    fn callback_is_thread_safe() {
        let handler = hidden_handler(1);
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart { name: "Liquid Properties" });
            callback(Progress::TaskIncrement);
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        let phase = handler.state.lock().unwrap();
        assert!(phase.bar.is_finished());
        assert_eq!(phase.bar.message(), "✓ [1/1] Liquid Properties");
    }
}
