//! todenet CLI
//!
//! Drives the board from the command line: create and edit nodes, draw
//! weighted links, run activation propagation, and inspect the commit
//! history. State persists in a RocksDB directory.
//!
//! Usage:
//!   todenet init
//!   todenet add <name> [x y]
//!   todenet row <name,name,...>
//!   todenet remove <id>
//!   todenet list
//!   todenet show <id>
//!   todenet set-commit <id> <value>
//!   todenet rename <id> <name>
//!   todenet color <id> <hex>
//!   todenet star <id>
//!   todenet acute <id>
//!   todenet link <source> <target>
//!   todenet unlink <source> <target>
//!   todenet weight <source> <target> up|down
//!   todenet propagate [iterations] [rate]
//!   todenet history <id>
//!   todenet export [file]
//!   todenet import <file>

use std::path::PathBuf;

use todenet_board::{
    default_export_filename, export_json, import_json, recent_days, Board, Error, HeatLevel,
    Result, Storage, BOARD_SIZE, PANEL_DAYS,
};
use todenet_engine::PropagationConfig;
use todenet_graph::{Node, NodeId};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_usage() {
    eprintln!("todenet - node-and-link goal board");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  todenet init                           Seed the starter board if empty");
    eprintln!("  todenet add <name> [x y]               Create a node");
    eprintln!("  todenet row <name,name,...>            Create a row of nodes");
    eprintln!("  todenet remove <id>                    Delete a node");
    eprintln!("  todenet list                           List all nodes");
    eprintln!("  todenet show <id>                      Show one node in detail");
    eprintln!("  todenet set-commit <id> <value>        Set a node's commit value");
    eprintln!("  todenet rename <id> <name>             Rename a node");
    eprintln!("  todenet color <id> <hex>               Recolor a node");
    eprintln!("  todenet star <id>                      Toggle the star flag");
    eprintln!("  todenet acute <id>                     Toggle the history-panel flag");
    eprintln!("  todenet link <source> <target>         Draw a link (weight 1)");
    eprintln!("  todenet unlink <source> <target>       Remove a link");
    eprintln!("  todenet weight <source> <target> up|down  Cycle a link weight");
    eprintln!("  todenet propagate [iterations] [rate]  Run activation propagation");
    eprintln!("  todenet history <id>                   Recent commit deltas for a node");
    eprintln!("  todenet export [file]                  Export all nodes as JSON");
    eprintln!("  todenet import <file>                  Replace the board from a JSON export");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TODENET_DATA  Data directory (default: ./todenet-data)");
}

fn data_dir() -> PathBuf {
    std::env::var("TODENET_DATA")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./todenet-data"))
}

fn arg<'a>(args: &'a [String], index: usize, what: &str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| Error::InvalidInput(format!("missing argument: {}", what)))
}

fn parse_f64(value: &str, what: &str) -> Result<f64> {
    value
        .parse()
        .map_err(|_| Error::InvalidInput(format!("{} must be a number, got '{}'", what, value)))
}

fn print_node_line(node: &Node) {
    let star = if node.starred { "*" } else { " " };
    println!(
        "{} {:<20} {:<20} commit {:>8.1}  activation {:>10.2}",
        star, node.id, node.name, node.commit, node.activation
    );
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todenet=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    if matches!(args[1].as_str(), "-h" | "--help" | "help") {
        print_usage();
        return;
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let storage = Storage::open(data_dir())?;
    let mut board = Board::from_parts(storage.load_graph()?, storage.load_history()?);

    let mutated = dispatch(args, &mut board)?;

    if mutated {
        storage.save_graph(board.graph())?;
        storage.save_history(board.history())?;
    }
    Ok(())
}

/// Run one command against the board. Returns whether state changed.
fn dispatch(args: &[String], board: &mut Board) -> Result<bool> {
    let center = BOARD_SIZE / 2.0;

    match args[1].as_str() {
        "init" => {
            if board.graph().is_empty() {
                *board = Board::seeded();
                println!("Seeded starter board with {} nodes.", board.graph().len());
                Ok(true)
            } else {
                println!("Board already has {} nodes; nothing to do.", board.graph().len());
                Ok(false)
            }
        }
        "add" => {
            let name = arg(args, 2, "name")?.to_string();
            let x = match args.get(3) {
                Some(v) => parse_f64(v, "x")?,
                None => center,
            };
            let y = match args.get(4) {
                Some(v) => parse_f64(v, "y")?,
                None => center,
            };
            let id = board.add_node(x, y);
            let commit = board
                .graph()
                .node(&id)
                .map(|n| n.commit)
                .unwrap_or_default();
            board.update_content(&id, &name, commit)?;
            println!("Created {}", id);
            Ok(true)
        }
        "row" => {
            let names: Vec<String> = arg(args, 2, "names")?
                .split(',')
                .map(str::to_string)
                .collect();
            let created = board.add_node_row(&names, center, center);
            if created.is_empty() {
                return Err(Error::InvalidInput("no valid node names provided".into()));
            }
            println!("{} new node(s) created.", created.len());
            Ok(true)
        }
        "remove" => {
            let id = NodeId::from(arg(args, 2, "id")?);
            let removed = board.delete_node(&id)?;
            println!("Deleted {} ({})", removed.id, removed.name);
            Ok(true)
        }
        "list" => {
            if board.graph().is_empty() {
                println!("(empty board - run 'todenet init' to seed it)");
            }
            for node in board.graph().iter() {
                print_node_line(node);
            }
            Ok(false)
        }
        "show" => {
            let id = NodeId::from(arg(args, 2, "id")?);
            let node = board
                .graph()
                .node(&id)
                .ok_or_else(|| Error::NotFound(id.to_string()))?;
            print_node_line(node);
            println!("  position ({:.0}, {:.0})  color {}", node.x, node.y, node.color);
            for (target, weight) in &node.links {
                let label = board
                    .graph()
                    .node(target)
                    .map(|n| n.name.as_str())
                    .unwrap_or("(dangling)");
                println!("  -> {} [{}] weight {}", target, label, weight);
            }
            Ok(false)
        }
        "set-commit" => {
            let id = NodeId::from(arg(args, 2, "id")?);
            let value = parse_f64(arg(args, 3, "value")?, "value")?;
            let name = board
                .graph()
                .node(&id)
                .ok_or_else(|| Error::NotFound(id.to_string()))?
                .name
                .clone();
            board.update_content(&id, &name, value)?;
            println!("{} commit = {}", id, value);
            Ok(true)
        }
        "rename" => {
            let id = NodeId::from(arg(args, 2, "id")?);
            let name = arg(args, 3, "name")?.to_string();
            let commit = board
                .graph()
                .node(&id)
                .ok_or_else(|| Error::NotFound(id.to_string()))?
                .commit;
            board.update_content(&id, &name, commit)?;
            println!("{} renamed to {}", id, name);
            Ok(true)
        }
        "color" => {
            let id = NodeId::from(arg(args, 2, "id")?);
            let color = arg(args, 3, "hex")?;
            board.update_color(&id, color)?;
            println!("{} color = {}", id, color);
            Ok(true)
        }
        "star" => {
            let id = NodeId::from(arg(args, 2, "id")?);
            let starred = board.toggle_star(&id)?;
            println!("{} starred = {}", id, starred);
            Ok(true)
        }
        "acute" => {
            let id = NodeId::from(arg(args, 2, "id")?);
            let acute = board.toggle_acute(&id)?;
            println!("{} on history panel = {}", id, acute);
            Ok(true)
        }
        "link" => {
            let source = NodeId::from(arg(args, 2, "source")?);
            let target = NodeId::from(arg(args, 3, "target")?);
            board.link(&source, &target)?;
            println!("{} -> {} (weight 1)", source, target);
            Ok(true)
        }
        "unlink" => {
            let source = NodeId::from(arg(args, 2, "source")?);
            let target = NodeId::from(arg(args, 3, "target")?);
            board.unlink(&source, &target)?;
            println!("{} -> {} removed", source, target);
            Ok(true)
        }
        "weight" => {
            let source = NodeId::from(arg(args, 2, "source")?);
            let target = NodeId::from(arg(args, 3, "target")?);
            let weight = match arg(args, 4, "direction")? {
                "up" => board.weight_up(&source, &target)?,
                "down" => board.weight_down(&source, &target)?,
                other => {
                    return Err(Error::InvalidInput(format!(
                        "direction must be 'up' or 'down', got '{}'",
                        other
                    )))
                }
            };
            println!("{} -> {} weight = {}", source, target, weight);
            Ok(true)
        }
        "propagate" => {
            let defaults = PropagationConfig::default();
            let iterations = match args.get(2) {
                Some(v) => v.parse().map_err(|_| {
                    Error::InvalidInput(format!("iterations must be an integer, got '{}'", v))
                })?,
                None => defaults.iterations,
            };
            let rate = match args.get(3) {
                Some(v) => parse_f64(v, "rate")?,
                None => defaults.rate,
            };
            board.propagate(&PropagationConfig::new(iterations, rate))?;
            println!(
                "Propagation complete ({} iterations, rate {}).",
                iterations, rate
            );
            for node in board.graph().iter() {
                print_node_line(node);
            }
            Ok(true)
        }
        "history" => {
            let id = NodeId::from(arg(args, 2, "id")?);
            let node = board
                .graph()
                .node(&id)
                .ok_or_else(|| Error::NotFound(id.to_string()))?;
            println!("Commit history for {} ({})", node.id, node.name);
            for (i, day) in recent_days(PANEL_DAYS).iter().enumerate() {
                let delta = board.history().delta(&id, day);
                let label = if i == 0 {
                    "Td ".to_string()
                } else {
                    format!("D-{}", i)
                };
                println!(
                    "  {} {}  {:+8.1}  {:?}",
                    label,
                    day,
                    delta,
                    HeatLevel::from_delta(delta)
                );
            }
            Ok(false)
        }
        "export" => {
            let path = args
                .get(2)
                .cloned()
                .unwrap_or_else(default_export_filename);
            let json = export_json(board.graph())?;
            std::fs::write(&path, json)?;
            println!("Exported {} node(s) to {}", board.graph().len(), path);
            Ok(false)
        }
        "import" => {
            let path = arg(args, 2, "file")?;
            let data = std::fs::read_to_string(path)?;
            let graph = import_json(&data)?;
            println!("Imported {} node(s) from {}", graph.len(), path);
            board.set_graph(graph);
            Ok(true)
        }
        other => {
            print_usage();
            Err(Error::InvalidInput(format!("unknown command: {}", other)))
        }
    }
}
