//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `venuemap_core` linkage.
//! - Print a short summary of the persisted map state for local sanity
//!   checks.

use std::process::ExitCode;
use venuemap_core::db::{open_db, open_db_in_memory};
use venuemap_core::{MapService, SqliteStateRepository};

fn main() -> ExitCode {
    println!("venuemap_core version={}", venuemap_core::core_version());

    // Optional db path argument; defaults to an in-memory probe so the
    // binary stays side-effect free when run without arguments.
    let conn = match std::env::args().nth(1) {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    };
    let conn = match conn {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open database: {err}");
            return ExitCode::FAILURE;
        }
    };

    let repo = match SqliteStateRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("failed to attach repository: {err}");
            return ExitCode::FAILURE;
        }
    };

    let service = MapService::new(repo);
    let state = service.load();

    println!("layers={}", state.layers.len());
    for layer in &state.layers {
        let active = if layer.id == state.active_layer_id {
            "*"
        } else {
            " "
        };
        println!(
            "{active} {} name={:?} image={:?} markers={}",
            layer.id,
            layer.name,
            layer.image_ref,
            layer.markers.len()
        );
    }

    ExitCode::SUCCESS
}
