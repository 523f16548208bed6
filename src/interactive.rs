//! Prompt-driven exploration: ask for filters, print the summary, page
//! through raw rows, and offer to start over.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::Result;
use bikeshare_stats::output;
use bikeshare_stats::{City, Dataset, DayFilter, FilterSpec, MonthFilter, RecordStore, filter};
use tracing::{error, info};

use crate::{load_city, summarize};

const PAGE_SIZE: usize = 5;

pub struct Session<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Runs until the user declines to restart or input ends. Each city is
    /// loaded at most once per session.
    pub fn run(&mut self, store: &RecordStore) -> Result<()> {
        let mut loaded: HashMap<City, Dataset> = HashMap::new();
        writeln!(self.output, "Hello! Let's explore some US bikeshare data!")?;

        loop {
            let Some(spec) = self.get_filters()? else {
                break;
            };
            writeln!(self.output, "{}", output::SEPARATOR)?;

            let dataset = match loaded.entry(spec.city) {
                Entry::Occupied(e) => e.into_mut(),
                Entry::Vacant(e) => match load_city(store, spec.city) {
                    Ok(ds) => e.insert(ds),
                    Err(err) => {
                        error!(city = %spec.city, error = %err, "Failed to load trip data");
                        writeln!(self.output, "Could not load data for {}: {err:#}", spec.city)?;
                        if self.ask_restart()? {
                            continue;
                        }
                        break;
                    }
                },
            };

            let filtered = filter(dataset, &spec);
            match summarize(&filtered, &spec) {
                Ok(summary) => {
                    writeln!(self.output, "{}", output::render_summary(&summary))?;
                    writeln!(self.output, "{}", output::SEPARATOR)?;
                    self.show_raw_rows(&filtered)?;
                }
                Err(err) => {
                    writeln!(self.output, "No trips match these filters ({err}).")?;
                }
            }

            if !self.ask_restart()? {
                break;
            }
        }

        info!("Exploration session finished");
        Ok(())
    }

    /// Asks for city, month and day. `None` if input ends first.
    pub fn get_filters(&mut self) -> Result<Option<FilterSpec>> {
        let Some(city) = self.choose::<City>(
            "Please input one of the following: Chicago, New York City, or Washington: ",
        )?
        else {
            return Ok(None);
        };
        let Some(month) =
            self.choose::<MonthFilter>("Please input one month from January to June or 'all': ")?
        else {
            return Ok(None);
        };
        let Some(day) = self
            .choose::<DayFilter>("Please input a day of the week from Monday to Sunday or 'all': ")?
        else {
            return Ok(None);
        };
        Ok(Some(FilterSpec::new(city, month, day)))
    }

    /// Prints five rows at a time for as long as the user answers "yes".
    pub fn show_raw_rows(&mut self, dataset: &Dataset) -> Result<()> {
        let mut offset = 0;
        loop {
            let Some(answer) = self.ask(
                "\nWould you like to display 5 rows of the raw data? Enter yes or no.",
            )?
            else {
                return Ok(());
            };
            match answer.to_lowercase().as_str() {
                "yes" => {
                    let rows = dataset.page(offset, PAGE_SIZE);
                    if rows.is_empty() {
                        writeln!(self.output, "No more rows to display.")?;
                        break;
                    }
                    writeln!(
                        self.output,
                        "{}",
                        output::render_rows(dataset.schema(), offset, rows)
                    )?;
                    offset += rows.len();
                }
                "no" => break,
                _ => writeln!(self.output, "That is not an option, please enter yes or no")?,
            }
        }
        writeln!(self.output, "{}", output::SEPARATOR)?;
        Ok(())
    }

    /// Anything other than "yes" ends the session.
    fn ask_restart(&mut self) -> Result<bool> {
        let answer = self.ask("\nWould you like to restart? Enter yes or no.")?;
        Ok(answer.is_some_and(|a| a.eq_ignore_ascii_case("yes")))
    }

    /// Re-prompts until the answer parses as `T`.
    fn choose<T: FromStr>(&mut self, question: &str) -> Result<Option<T>> {
        loop {
            let Some(answer) = self.ask(question)? else {
                return Ok(None);
            };
            match answer.parse() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.output, "That is not an option, please try again.")?,
            }
        }
    }

    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        writeln!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
