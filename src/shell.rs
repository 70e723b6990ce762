//! The interactive console around [`RbTree`].
//!
//! Each round prints a menu and reads one command line. Commands are chosen
//! by their first letter, case-insensitively. Commands that take a key read
//! it from the following line.
use core::{ops::ControlFlow, str::FromStr};
use std::{
    format,
    fs::File,
    io::{self, BufRead, BufReader, Write},
    prelude::v1::*,
};

use crate::{
    config::{self, Config},
    Error, RbTree,
};


const SEPARATOR: &str = "--------------------------------------------------------------";

const HELP: &[&str] = &[
    "ADD: Allows you to input numbers to be added to the tree",
    "DELETE: Removes a number from the tree",
    "PRINT: Prints the tree sideways, the root on the left",
    "READ: Generates numbers from a file and adds them to the tree",
    "SEARCH: Checks whether a number is in the tree",
    "HELP: Displays this message",
    "QUIT: Exits the program",
];

/// A console command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    Add,
    Delete,
    Print,
    Read,
    Search,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('A') => Ok(Self::Add),
            Some('D') => Ok(Self::Delete),
            Some('P') => Ok(Self::Print),
            Some('R') => Ok(Self::Read),
            Some('S') => Ok(Self::Search),
            Some('H') => Ok(Self::Help),
            Some('Q') => Ok(Self::Quit),
            _ => Err(Error::UnknownCommand(s.into())),
        }
    }
}

/// Drives an [`RbTree`]`<i32>` from a line-oriented console.
pub struct Shell<R, W> {
    tree: RbTree<i32>,
    config: Config,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(config: Config, input: R, output: W) -> Self {
        Self {
            tree: RbTree::new(),
            config,
            input,
            output,
        }
    }

    #[inline]
    pub fn tree(&self) -> &RbTree<i32> {
        &self.tree
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Take the tree and the output stream back.
    pub fn into_inner(self) -> (RbTree<i32>, W) {
        (self.tree, self.output)
    }

    /// Run commands until `QUIT` or the end of input.
    ///
    /// Malformed input is reported on the console and doesn't stop the
    /// loop. Only I/O errors on the console streams are returned.
    pub fn run(&mut self) -> Result<(), Error> {
        loop {
            writeln!(self.output, "{}", SEPARATOR)?;
            let Some(line) = self.prompt(
                "What Would You Like To Do? (ADD/DELETE/PRINT/READ/SEARCH/HELP/QUIT)",
            )?
            else {
                log::debug!("end of input");
                return Ok(());
            };

            match line.parse::<Command>() {
                Ok(command) => {
                    log::debug!("command {:?}", command);
                    if self.execute(command)?.is_break() {
                        return Ok(());
                    }
                }
                Err(e) => {
                    log::info!("{}", e);
                    writeln!(self.output, "Sorry, Please Try Again")?;
                }
            }
        }
    }

    /// Execute one command. Returns `Break` if the loop should end.
    pub fn execute(&mut self, command: Command) -> Result<ControlFlow<()>, Error> {
        match command {
            Command::Add => {
                let Some(line) = self.prompt_key()? else {
                    return Ok(ControlFlow::Break(()));
                };
                match self.config.parse_key(&line) {
                    Ok(key) => {
                        log::debug!("insert {}", key);
                        self.tree.insert(key);
                    }
                    Err(e) => {
                        log::info!("rejected: {}", e);
                        writeln!(self.output, "Invalid Input")?;
                    }
                }
            }
            Command::Delete => {
                let Some(line) = self.prompt_key()? else {
                    return Ok(ControlFlow::Break(()));
                };
                match self.config.parse_key(&line) {
                    Ok(key) if self.tree.remove(&key) => {
                        log::debug!("removed {}", key);
                    }
                    Ok(key) => {
                        log::debug!("{} is absent", key);
                        writeln!(self.output, "Number Is Not In The Tree")?;
                    }
                    Err(e) => {
                        log::info!("rejected: {}", e);
                        writeln!(self.output, "Number Is Not In The Tree")?;
                    }
                }
            }
            Command::Print => {
                writeln!(self.output, "Printing Tree")?;
                write!(self.output, "{}", self.tree.dump(self.config.indent))?;
                writeln!(self.output)?;
            }
            Command::Read => {
                writeln!(self.output, "Generating Numbers From File")?;
                self.read_numbers_file()?;
            }
            Command::Search => {
                let Some(line) = self.prompt("What Value Would You Like To Search For?")? else {
                    return Ok(ControlFlow::Break(()));
                };
                match config::parse_value(&line) {
                    Ok(value) if self.tree.contains(&value) => {
                        writeln!(self.output, "Value Found: {}", value)?;
                    }
                    Ok(_) => writeln!(self.output, "Value Not Found")?,
                    Err(e) => {
                        log::info!("rejected: {}", e);
                        writeln!(self.output, "Invalid Input")?;
                    }
                }
            }
            Command::Help => {
                for line in HELP {
                    writeln!(self.output, "{}", line)?;
                }
            }
            Command::Quit => return Ok(ControlFlow::Break(())),
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Insert every whitespace-separated integer from `reader` in order.
    /// Stops at the first token that isn't an integer. Returns the number of
    /// inserted keys.
    ///
    /// The keys inserted before a read error are kept.
    pub fn load_numbers(&mut self, reader: impl BufRead) -> Result<usize, Error> {
        let mut count = 0;
        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    log::warn!("read failed after {} numbers", count);
                    return Err(e.into());
                }
            };
            for token in line.split_whitespace() {
                match config::parse_value(token) {
                    Ok(value) => {
                        self.tree.insert(value);
                        count += 1;
                    }
                    Err(e) => {
                        log::info!("stopped loading: {}", e);
                        return Ok(count);
                    }
                }
            }
        }
        Ok(count)
    }

    /// Bulk-load from [`Config::numbers_path`]. File errors are reported on
    /// the console.
    fn read_numbers_file(&mut self) -> io::Result<()> {
        let path = self.config.numbers_path.clone();
        let result = File::open(&path)
            .map_err(Error::from)
            .and_then(|file| self.load_numbers(BufReader::new(file)));
        match result {
            Ok(count) => {
                log::info!("loaded {} numbers from {}", count, path.display());
            }
            Err(e) => {
                log::warn!("failed to load {}: {}", path.display(), e);
                writeln!(self.output, "Could Not Read {}: {}", path.display(), e)?;
            }
        }
        Ok(())
    }

    fn prompt_key(&mut self) -> io::Result<Option<String>> {
        let text = format!(
            "Input a Number Between {}-{}",
            self.config.min_key, self.config.max_key
        );
        self.prompt(&text)
    }

    /// Print `text` and read a line. Returns `None` at the end of input.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        writeln!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            Ok(None)
        } else {
            Ok(Some(line))
        }
    }
}
