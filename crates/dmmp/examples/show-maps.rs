//! Print every multipath map, path group and path multipathd knows about.
//!
//! Run with (needs access to the multipathd socket, usually root):
//!   cargo run --example show-maps
//!
//! Set `DMMP_LOG=debug` to see the socket exchange on stderr.

use dmmp::{mpaths_get, PathGroupStatus, PathStatus};
use tracing::level_filters::LevelFilter;

fn init_logging() {
    let level = std::env::var("DMMP_LOG")
        .ok()
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::INFO);

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false)
        .try_init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let mpaths = mpaths_get()?.collect::<Result<Vec<_>, _>>()?;
    println!("Got {} mpath(s)", mpaths.len());

    for mpath in &mpaths {
        println!(
            "Got mpath: wwid '{}', name '{}', kdev '{}'",
            mpath.wwid(),
            mpath.name(),
            mpath.kdev_name()
        );
        for pg in mpath.path_groups() {
            println!(
                "\tGot path group: id '{}', priority '{}', status '{}({})', selector '{}'",
                pg.id(),
                pg.priority(),
                pg.status().code(),
                PathGroupStatus::code_to_str(pg.status().code()),
                pg.selector()
            );
            for path in pg.paths() {
                println!(
                    "\t\tGot path: blk_name '{}', status '{}({})'",
                    path.blk_name(),
                    path.status().code(),
                    PathStatus::code_to_str(path.status().code())
                );
            }
        }
    }

    Ok(())
}
