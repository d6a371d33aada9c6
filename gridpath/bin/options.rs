//! Command line options.
//! Without `--image` a maze of `--rows` x `--columns` is generated (seeded by `--seed` if given)
//! and solved. With `--image` the grid is read from a thresholded image and solved between
//! `--start` and `--end`.

use std::{ffi::OsString, path::PathBuf};

use anyhow::anyhow;
use clap::{value_parser, Arg, ArgAction, Command};
use gridpath::Position;

fn make_options_parser() -> Command {
    Command::new("gridpath")
        .no_binary_name(true)
        .version("v0.1.0")
        .about("Generate and solve grid mazes")
        .arg(
            Arg::new("rows")
                .short('r')
                .long("rows")
                .help("Number of maze rows")
                .value_parser(value_parser!(usize))
                .default_value("21"),
        )
        .arg(
            Arg::new("columns")
                .short('c')
                .long("columns")
                .help("Number of maze columns")
                .value_parser(value_parser!(usize))
                .default_value("41"),
        )
        .arg(
            Arg::new("seed")
                .short('s')
                .long("seed")
                .help("Seed for the maze generator, random if not given")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("image")
                .short('i')
                .long("image")
                .value_name("FILE")
                .help("Solve the grid drawn in this image instead of a generated maze")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("start")
                .long("start")
                .value_name("ROW,COL")
                .help("Start cell, required with --image")
                .value_parser(parse_position),
        )
        .arg(
            Arg::new("end")
                .long("end")
                .value_name("ROW,COL")
                .help("End cell, required with --image")
                .value_parser(parse_position),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the grid and path as JSON")
                .action(ArgAction::SetTrue),
        )
}

fn parse_position(s: &str) -> Result<Position, String> {
    s.parse::<Position>().map_err(|e| e.to_string())
}

#[derive(Debug, PartialEq)]
pub enum Source {
    Maze {
        rows: usize,
        columns: usize,
        seed: Option<u64>,
    },
    Image {
        path: PathBuf,
        start: Position,
        end: Position,
    },
}

#[derive(Debug)]
pub struct Options {
    pub source: Source,
    pub json: bool,
}

impl Options {
    pub fn parse_from_args<I, T>(flags: I) -> Result<Self, anyhow::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = make_options_parser().try_get_matches_from(flags)?;

        let source = match matches.get_one::<PathBuf>("image") {
            Some(path) => Source::Image {
                path: path.clone(),
                start: *matches
                    .get_one::<Position>("start")
                    .ok_or_else(|| anyhow!("--start is required with --image"))?,
                end: *matches
                    .get_one::<Position>("end")
                    .ok_or_else(|| anyhow!("--end is required with --image"))?,
            },
            None => Source::Maze {
                rows: *matches.get_one::<usize>("rows").unwrap_or(&21),
                columns: *matches.get_one::<usize>("columns").unwrap_or(&41),
                seed: matches.get_one::<u64>("seed").copied(),
            },
        };

        Ok(Options {
            source,
            json: matches.get_flag("json"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::parse_from_args(Vec::<String>::new()).unwrap();
        assert_eq!(
            options.source,
            Source::Maze {
                rows: 21,
                columns: 41,
                seed: None
            }
        );
        assert!(!options.json);
    }

    #[test]
    fn test_maze_args() {
        let options = Options::parse_from_args(["-r", "5", "--columns", "7", "-s", "9", "--json"])
            .unwrap();
        assert_eq!(
            options.source,
            Source::Maze {
                rows: 5,
                columns: 7,
                seed: Some(9)
            }
        );
        assert!(options.json);
    }

    #[test]
    fn test_image_args() {
        let options =
            Options::parse_from_args(["-i", "maze.png", "--start", "14,0", "--end", "44,51"])
                .unwrap();
        assert_eq!(
            options.source,
            Source::Image {
                path: PathBuf::from("maze.png"),
                start: Position::new(14, 0),
                end: Position::new(44, 51),
            }
        );
    }

    #[test]
    fn test_parse_err() {
        assert!(Options::parse_from_args(["-i", "maze.png", "--start", "1,1"]).is_err());
        assert!(Options::parse_from_args(["--start", "nope"]).is_err());
        assert!(Options::parse_from_args(["--rows", "-3"]).is_err());
    }
}
