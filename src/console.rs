//! Console: interactive menu front end for the word tally.
//!
//! Generic over its reader and writer so tests can drive the loop with
//! in-memory buffers.

use crate::tally::WordTally;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

const MENU: &str = "\
Input the number you want:
1) Tally the words of a file
2) Tally a line typed here
3) Delete a word from the tally
4) Show the whole tally
5) Show the top three words
6) Show the tally size
7) Clear the tally
8) Show this menu
9) Quit
";

pub struct Console<R, W> {
    tally: WordTally,
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self {
            tally: WordTally::new(),
            input,
            out,
        }
    }

    pub fn tally(&self) -> &WordTally {
        &self.tally
    }

    /// Tally every whitespace-separated word of `line`; returns how many
    /// were recorded.
    pub fn add_line(&mut self, line: &str) -> usize {
        line.split_whitespace()
            .filter(|w| self.tally.add((*w).to_string()))
            .count()
    }

    /// Tally a whole file, line by line; returns how many words were
    /// recorded.
    pub fn load_file(&mut self, path: &Path) -> io::Result<usize> {
        let file = BufReader::new(File::open(path)?);
        let mut words = 0;
        for line in file.lines() {
            words += self.add_line(&line?);
        }
        Ok(words)
    }

    /// Run the menu loop until quit or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.out, "{MENU}")?;
        while let Some(command) = self.read_line()? {
            match command.trim() {
                "1" => self.tally_file()?,
                "2" => self.tally_line()?,
                "3" => self.delete_word()?,
                "4" => writeln!(self.out, "{}", self.tally)?,
                "5" => self.show_top_words()?,
                "6" => writeln!(self.out, "{}", self.tally.len())?,
                "7" => self.tally.clear(),
                "8" => writeln!(self.out, "{MENU}")?,
                "9" => break,
                "" => {}
                _ => writeln!(self.out, "Wrong command!\n\n{MENU}")?,
            }
        }
        Ok(())
    }

    /// Next input line, or `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn tally_file(&mut self) -> io::Result<()> {
        writeln!(self.out, "File name:")?;
        let Some(name) = self.read_line()? else {
            return Ok(());
        };
        let path = Path::new(name.trim());
        match self.load_file(path) {
            Ok(words) => writeln!(self.out, "Tallied {words} words"),
            Err(err) => writeln!(self.out, "Could not read {}: {err}", path.display()),
        }
    }

    fn tally_line(&mut self) -> io::Result<()> {
        let Some(line) = self.read_line()? else {
            return Ok(());
        };
        let words = self.add_line(&line);
        writeln!(self.out, "Tallied {words} words")
    }

    fn delete_word(&mut self) -> io::Result<()> {
        let Some(word) = self.read_line()? else {
            return Ok(());
        };
        if !self.tally.remove(word.trim()) {
            writeln!(self.out, "Word is missing!")?;
        }
        Ok(())
    }

    fn show_top_words(&mut self) -> io::Result<()> {
        for (word, count) in self.tally.top_words() {
            write!(self.out, "({word} : {count}) ")?;
        }
        writeln!(self.out)
    }
}
