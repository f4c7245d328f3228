use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, value_parser};

/// Upper bound for chapter counts and chapter numbers on the command line.
const MAX_CHAPTERS: i64 = 1000;

#[derive(Debug, Parser)]
#[command(
    name = "readtrack",
    version,
    about = "Track which chapters of your books you have read"
)]
pub struct Cli {
    /// Progress database file (defaults to READTRACK_DB or the data directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show chapter progress for a book
    Show {
        book: String,
        #[arg(long, value_parser = value_parser!(u32).range(1..=MAX_CHAPTERS))]
        chapters: u32,
    },
    /// Mark a chapter (1-based) read, or unread if it already is
    Toggle {
        book: String,
        #[arg(value_parser = value_parser!(u32).range(1..=MAX_CHAPTERS))]
        chapter: u32,
        #[arg(long, value_parser = value_parser!(u32).range(1..=MAX_CHAPTERS))]
        chapters: Option<u32>,
    },
    /// Mark every chapter of a book read
    MarkAll {
        book: String,
        #[arg(long, value_parser = value_parser!(u32).range(1..=MAX_CHAPTERS))]
        chapters: u32,
    },
    /// Clear all read chapters of a book
    Reset { book: String },
    /// List every tracked book
    List,
    /// Print the stored progress document
    Export,
    /// Merge a progress document (or a browser tracker export) into the store
    Import { file: PathBuf },
    /// Interactive chapter tracker for a book
    Tui {
        book: String,
        #[arg(long, value_parser = value_parser!(u32).range(1..=MAX_CHAPTERS))]
        chapters: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("readtrack").chain(args.iter().copied()))
    }

    #[test]
    fn chapter_counts_must_be_within_bounds() {
        for command in ["show", "mark-all", "tui"] {
            assert!(parse(&[command, "xaisa", "--chapters", "0"]).is_err());
            assert!(parse(&[command, "xaisa", "--chapters", "1001"]).is_err());
            assert!(parse(&[command, "xaisa", "--chapters", "4294967295"]).is_err());
            assert!(parse(&[command, "xaisa", "--chapters", "1000"]).is_ok());
        }
    }

    #[test]
    fn toggle_chapter_numbers_must_be_within_bounds() {
        assert!(parse(&["toggle", "xaisa", "0"]).is_err());
        assert!(parse(&["toggle", "xaisa", "1001"]).is_err());
        assert!(parse(&["toggle", "xaisa", "3", "--chapters", "5000"]).is_err());

        let cli = parse(&["toggle", "xaisa", "3", "--chapters", "12"]).unwrap();
        match cli.command {
            Some(Command::Toggle {
                book,
                chapter,
                chapters,
            }) => {
                assert_eq!(book, "xaisa");
                assert_eq!(chapter, 3);
                assert_eq!(chapters, Some(12));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_options_parse_after_subcommand() {
        let cli = parse(&["list", "--db", "/tmp/progress.db", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/progress.db")));
        assert!(matches!(cli.command, Some(Command::List)));
    }
}
