//! `pyticket` - Hierarchical ticket tracker
//!
//! Tickets live in a `.pyticket` directory next to the project they track.
//! No server, no daemon: every invocation reads and rewrites local files.

use pyticket::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("pyticket: {e}");
        std::process::exit(1);
    }
}
