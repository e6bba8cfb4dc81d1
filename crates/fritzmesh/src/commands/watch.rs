//! Periodic refresh: redraw the topology each time the coordinator publishes.

use tokio::task::JoinHandle;

use fritzmesh_core::{Coordinator, MeshSnapshot, RefreshState, Source};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output::{self, Painter};

use super::topology;

/// Run until Ctrl+C. `--interval` is folded into the coordinator's config
/// before it is built.
pub async fn handle(coordinator: &Coordinator<Source>, global: &GlobalOpts) -> Result<(), CliError> {
    let painter = Painter::new(&global.color);
    let mut snapshots = coordinator.snapshots();
    let mut state = coordinator.state();

    if !global.quiet {
        eprintln!(
            "Watching {} every {}s (Ctrl+C to stop)",
            coordinator.source().describe(),
            coordinator.config().poll_interval.as_secs().max(1)
        );
    }
    let task = coordinator.spawn();
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let latest = snapshots.borrow_and_update().clone();
                if let Some(snapshot) = latest {
                    let out = render(&snapshot, global, painter)?;
                    output::print_output(&out, global.quiet);
                }
            }
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = state.borrow_and_update().clone();
                if let RefreshState::Failed { message } = current {
                    // The last good snapshot stays on screen.
                    eprintln!("{}", painter.warning(&format!("refresh failed: {message}")));
                }
            }
            _ = &mut interrupt => {
                tracing::debug!("interrupt received, stopping watch");
                break;
            }
        }
    }

    coordinator.shutdown();
    join_poll_task(task).await;
    Ok(())
}

/// Wait for the polling task to wind down. Returns `false` if it panicked
/// or was aborted.
async fn join_poll_task(task: JoinHandle<()>) -> bool {
    match task.await {
        Ok(()) => true,
        Err(err) => {
            tracing::error!(error = %err, "mesh polling task did not stop cleanly");
            false
        }
    }
}

fn render(snapshot: &MeshSnapshot, global: &GlobalOpts, painter: Painter) -> Result<String, CliError> {
    match global.output {
        OutputFormat::Table | OutputFormat::Plain => {
            let stamp = snapshot.refreshed_at.format("%Y-%m-%d %H:%M:%S UTC");
            let header = format!(
                "{} {} hubs, {} clients{}",
                painter.dim(&stamp.to_string()),
                snapshot.topology.hubs.len(),
                snapshot.topology.client_count(),
                if snapshot.enriched { "" } else { " (not enriched)" }
            );
            Ok(format!(
                "{header}\n{}\n",
                topology::render_tree(&snapshot.topology, painter)
            ))
        }
        // One document per refresh.
        ref structured => output::render_structured(structured, &snapshot.topology),
    }
}
