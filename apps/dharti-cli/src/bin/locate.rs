use std::env;

use dharti_cli::{build_resolver, init_tracing, ConsoleSurface};
use dharti_core::config::Config;
use dharti_locator::{CameraDirector, FocusTarget, LocateQuery, LocatorSession, SearchOutcome};

fn usage(prog: &str) -> ! {
    eprintln!("Usage: {} [--parcel TEXT] [--owner TEXT] [--address TEXT]", prog);
    std::process::exit(1)
}

fn parse_args() -> LocateQuery {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    let mut query = LocateQuery::default();
    let mut i = 0;
    while i < args.len() {
        let Some(value) = args.get(i + 1).cloned() else {
            usage(&prog)
        };
        match args[i].as_str() {
            "--parcel" | "-p" => query = query.parcel(value),
            "--owner" | "-o" => query = query.owner(value),
            "--address" | "-a" => query = query.address(value),
            other => {
                eprintln!("Unknown option: {}", other);
                usage(&prog)
            }
        }
        i += 2;
    }
    query
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let settings = config.settings()?;
    let query = parse_args();

    let session = LocatorSession::new(build_resolver(&settings)?);
    let resolution = match session.search(&query).await {
        SearchOutcome::Current(Ok(res)) => res,
        SearchOutcome::Current(Err(e)) => {
            tracing::debug!(error = ?e, "search failed");
            println!("❌ {}", e.user_message());
            return Ok(());
        }
        SearchOutcome::Stale(_) => return Ok(()),
    };

    match &resolution.parcel_id {
        Some(id) => println!(
            "✅ {} at ({:.6}, {:.6}) via {:?}",
            id, resolution.point.lat, resolution.point.lng, resolution.source
        ),
        None => println!(
            "✅ ({:.6}, {:.6}) via {:?}",
            resolution.point.lat, resolution.point.lng, resolution.source
        ),
    }

    let index = session.resolver().index();
    let target = FocusTarget::for_resolution(&resolution, index);
    let surface = ConsoleSurface::new(settings.map.clone());
    let mut director = CameraDirector::new(surface, settings.camera.clone());
    if let Err(e) = director.focus(&target, &index.outlines()).await {
        println!("⚠️  {}", dharti_core::LocateError::from(e).user_message());
    }
    Ok(())
}
