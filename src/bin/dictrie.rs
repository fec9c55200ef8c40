use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use dictrie::{DictionaryStore, StoreConfig};

/// Input line that ends an interactive session.
const END_SENTINEL: &str = "END";

#[derive(Parser)]
#[command(name = "dictrie", about = "Look up words in a word:meaning dictionary")]
struct Cli {
    /// JSON store configuration (overrides the path flags)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Source corpus with one word:meaning entry per line
    #[arg(long, default_value = "dict.txt")]
    source: PathBuf,
    /// Index snapshot file (defaults to the corpus path with .idx)
    #[arg(long)]
    index: Option<PathBuf>,
    /// Definition store file (defaults to the corpus path with .dat)
    #[arg(long)]
    data: Option<PathBuf>,
    /// Re-index the corpus even if a usable snapshot exists
    #[arg(long)]
    rebuild: bool,
    /// Words to look up; reads from stdin when omitted
    words: Vec<String>,
}

impl Cli {
    fn store_config(&self) -> dictrie::Result<StoreConfig> {
        if let Some(path) = &self.config {
            return StoreConfig::from_json_file(path);
        }
        let mut config = StoreConfig::from_source(&self.source);
        if let Some(index) = &self.index {
            config.index_path = index.clone();
        }
        if let Some(data) = &self.data {
            config.data_path = data.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

/// Prints `word: definition` for every match of `term` to `out`. A failed
/// read goes to `err` and the remaining matches are still printed.
fn print_matches<W: Write, E: Write>(store: &mut DictionaryStore, term: &str, out: &mut W, err: &mut E) -> io::Result<()> {
    for (word, offset) in store.search(term) {
        match store.read_definition(offset) {
            Ok(definition) => writeln!(out, "{}: {}", word, definition)?,
            Err(e) => writeln!(err, "{}: {}", word, e)?,
        }
    }
    Ok(())
}

/// Answers one query per input line until end of input or [`END_SENTINEL`].
fn run_session<R: BufRead, W: Write, E: Write>(
    store: &mut DictionaryStore,
    input: &mut R,
    out: &mut W,
    err: &mut E,
) -> io::Result<()> {
    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim_end_matches(['\r', '\n']);
        if query == END_SENTINEL {
            break;
        }
        if query.is_empty() {
            continue;
        }
        print_matches(store, query, out, err)?;
    }
    Ok(())
}

fn run(cli: Cli) -> dictrie::Result<()> {
    let config = cli.store_config()?;
    let mut store = if cli.rebuild {
        DictionaryStore::rebuild(config)?
    } else {
        DictionaryStore::open(config)?
    };

    let mut out = io::stdout().lock();
    let mut err = io::stderr().lock();
    if !cli.words.is_empty() {
        for word in &cli.words {
            print_matches(&mut store, word, &mut out, &mut err)?;
        }
        return Ok(());
    }
    run_session(&mut store, &mut io::stdin().lock(), &mut out, &mut err)?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{self, OpenOptions};
    use std::io::Cursor;
    use std::path::Path;

    use super::*;

    const CORPUS: &str = "cat:feline\ncatalog:a list of items\ncatapult:a siege engine\n";

    fn open_store(dir: &Path) -> DictionaryStore {
        let source = dir.join("dict.txt");
        fs::write(&source, CORPUS).unwrap();
        DictionaryStore::open(StoreConfig::from_source(source)).unwrap()
    }

    fn session(store: &mut DictionaryStore, input: &str) -> (String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        run_session(store, &mut Cursor::new(input.as_bytes()), &mut out, &mut err).unwrap();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_session_stops_at_end_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(dir.path());
        let (out, err) = session(&mut store, "cata\n\nEND\nignored\n");
        assert_eq!(out, "> catalog: a list of items\ncatapult: a siege engine\n> > ");
        assert!(err.is_empty());
    }

    #[test]
    fn test_session_ends_at_eof() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(dir.path());
        let (out, _) = session(&mut store, "CAT\r\nzzz\n");
        assert_eq!(out, "> cat: feline\n> > ");
    }

    #[test]
    fn test_failed_read_is_reported_and_session_continues() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(dir.path());
        OpenOptions::new()
            .write(true)
            .open(dir.path().join("dict.dat"))
            .unwrap()
            .set_len(0)
            .unwrap();

        let (out, err) = session(&mut store, "cat\ncata\nEND\n");
        assert_eq!(out, "> > > ");
        let lines: Vec<&str> = err.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("cat: "));
        assert!(lines[1].starts_with("catalog: "));
        assert!(lines[2].starts_with("catapult: "));
    }
}
