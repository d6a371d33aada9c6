mod options;

use gridpath::{generate_maze, solve, util::grid_from_image, CellState, Grid, Path};
use log::info;
use options::{Options, Source};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;

#[derive(Serialize)]
struct Report<'a> {
    grid: &'a Grid,
    path: Option<&'a Path>,
}

fn load_grid(source: &Source) -> Result<Grid, anyhow::Error> {
    match source {
        Source::Maze {
            rows,
            columns,
            seed,
        } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(*seed),
                None => StdRng::from_entropy(),
            };
            Ok(generate_maze(*rows, *columns, &mut rng)?)
        }
        Source::Image { path, start, end } => {
            let img = image::open(path)?;
            let mut grid = grid_from_image(&img)?;
            info!(
                "loaded {}x{} grid from {}",
                grid.rows(),
                grid.columns(),
                path.display()
            );
            grid.set_cell(*start, CellState::Start)?;
            grid.set_cell(*end, CellState::End)?;
            Ok(grid)
        }
    }
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let options = Options::parse_from_args(std::env::args_os().skip(1))?;

    let mut grid = load_grid(&options.source)?;
    let path = solve(&mut grid)?;

    if options.json {
        let report = Report {
            grid: &grid,
            path: path.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print!("{}", grid);
    match path {
        Some(path) => println!("path length: {}", path.len()),
        None => println!("no path found"),
    }

    Ok(())
}
