//! Interactive text menu over the medication inventory.
//!
//! Every mutation is saved right away. Bad input aborts the current action
//! without touching the inventory; end of input saves and exits.

use crate::display::{print_list, print_predictions};
use chrono::NaiveDate;
use medstock_core::inventory::{
    add_medication, edit_stock, remove_medication, skip_sleeping_medications,
};
use medstock_core::{Error, Medication, MedicationStore, Result, StockEdit};
use std::io::{BufRead, Write};
use std::str::FromStr;

pub struct Menu<'a, R, W> {
    input: R,
    output: W,
    store: &'a mut dyn MedicationStore,
    medications: Vec<Medication>,
    today: NaiveDate,
    buy_lead_days: u32,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(
        input: R,
        output: W,
        store: &'a mut dyn MedicationStore,
        today: NaiveDate,
        buy_lead_days: u32,
    ) -> Result<Self> {
        let medications = store.load_medications()?;
        Ok(Self {
            input,
            output,
            store,
            medications,
            today,
            buy_lead_days,
        })
    }

    /// Loop until the user exits or input ends
    pub fn run(mut self) -> Result<()> {
        loop {
            self.print_options()?;
            let Some(choice) = self.read_line("Choose an option: ")? else {
                break;
            };

            let outcome = match choice.as_str() {
                "1" => self.list(),
                "2" => self.add(),
                "3" => self.edit(),
                "4" => self.predictions(),
                "5" => self.skip_sleep(),
                "6" => self.remove(),
                "7" => break,
                other => Err(Error::InvalidInput(format!("unknown option {:?}", other))),
            };

            match outcome {
                Ok(()) => {}
                Err(Error::InvalidInput(msg)) => {
                    writeln!(self.output, "Invalid input: {}", msg)?;
                }
                Err(e) => return Err(e),
            }
        }

        self.save()?;
        writeln!(self.output, "Changes saved. Bye.")?;
        Ok(())
    }

    fn print_options(&mut self) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "Medication manager:")?;
        writeln!(self.output, "1 - List medications")?;
        writeln!(self.output, "2 - Add medication")?;
        writeln!(self.output, "3 - Edit stock")?;
        writeln!(self.output, "4 - View depletion forecasts")?;
        writeln!(self.output, "5 - Skip today's sleeping medication")?;
        writeln!(self.output, "6 - Remove medication")?;
        writeln!(self.output, "7 - Exit")?;
        Ok(())
    }

    fn list(&mut self) -> Result<()> {
        print_list(&mut self.output, &self.medications)?;
        Ok(())
    }

    fn add(&mut self) -> Result<()> {
        let name = self.require_line("Medication name: ")?;
        if name.is_empty() {
            return Err(Error::InvalidInput("name cannot be empty".into()));
        }
        let stock: u32 = self.read_number("Initial pill count: ")?;
        let daily: u32 = self.read_number("Pills per day (0 for as needed): ")?;
        let sleeping = self
            .require_line("Is it a sleeping medication? (y/n): ")?
            .eq_ignore_ascii_case("y");

        let position = add_medication(
            &mut self.medications,
            Medication::new(name.clone(), stock, daily, sleeping),
        );
        self.save()?;
        writeln!(self.output, "{} added at position {}.", name, position)?;
        Ok(())
    }

    fn edit(&mut self) -> Result<()> {
        print_list(&mut self.output, &self.medications)?;
        let position: usize = self.read_number("Number of the medication to edit: ")?;
        medstock_core::inventory::resolve_index(&self.medications, position)?;

        writeln!(self.output, "1 - Add pills")?;
        writeln!(self.output, "2 - Remove pills")?;
        writeln!(self.output, "3 - Set exact count")?;
        let action = self.require_line("Choose an action: ")?;

        let edit = match action.as_str() {
            "1" => StockEdit::Add(self.read_number("How many pills to add? ")?),
            "2" => StockEdit::Remove(self.read_number("How many pills to remove? ")?),
            "3" => StockEdit::Set(self.read_number("New exact pill count: ")?),
            other => {
                return Err(Error::InvalidInput(format!("unknown action {:?}", other)));
            }
        };

        let med = edit_stock(&mut self.medications, position, edit)?;
        let message = format!("{} now has {} pills.", med.name, med.stock);
        self.save()?;
        writeln!(self.output, "{}", message)?;
        Ok(())
    }

    fn predictions(&mut self) -> Result<()> {
        print_predictions(
            &mut self.output,
            &self.medications,
            self.today,
            self.buy_lead_days,
        )?;
        Ok(())
    }

    fn skip_sleep(&mut self) -> Result<()> {
        let skipped = skip_sleeping_medications(&mut self.medications, self.today);
        if skipped.is_empty() {
            writeln!(self.output, "No sleeping medication to skip today.")?;
            return Ok(());
        }

        self.save()?;
        for name in skipped {
            writeln!(self.output, "Skipping {} today.", name)?;
        }
        Ok(())
    }

    fn remove(&mut self) -> Result<()> {
        print_list(&mut self.output, &self.medications)?;
        if self.medications.is_empty() {
            return Ok(());
        }

        let position: usize = self.read_number("Number of the medication to remove: ")?;
        let removed = remove_medication(&mut self.medications, position)?;
        self.save()?;
        writeln!(self.output, "{} removed.", removed.name)?;
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        self.store.save_medications(&self.medications)
    }

    /// Prompt and read one trimmed line; `None` at end of input
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn require_line(&mut self, prompt: &str) -> Result<String> {
        self.read_line(prompt)?
            .ok_or_else(|| Error::InvalidInput("input ended".into()))
    }

    fn read_number<T: FromStr>(&mut self, prompt: &str) -> Result<T> {
        let raw = self.require_line(prompt)?;
        raw.parse()
            .map_err(|_| Error::InvalidInput(format!("{:?} is not a valid number", raw)))
    }
}
