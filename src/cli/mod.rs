//! Menu-driven shell for the finance tracker. All business logic lives in
//! the library; this layer only collects operator input and prints results.
//!
//! With `FINTRACK_CLI_SCRIPT` set, prompts read plain lines from stdin so
//! the shell can be driven from tests and scripts.

use std::io::BufRead;
use std::path::PathBuf;

use chrono::NaiveDate;
use colored::Colorize;
use dialoguer::Input;
use thiserror::Error;

use crate::errors::FinanceError;
use crate::ledger::{CategorySet, LedgerManager, Transaction, TransactionKind};
use crate::report::MonthlyReport;
use crate::storage::{FixedDepthRetention, JsonStore};
use crate::utils::format_currency;

const MENU_WIDTH: usize = 60;

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] FinanceError),
    #[error("input error: {0}")]
    Input(String),
}

impl From<dialoguer::Error> for CliError {
    fn from(err: dialoguer::Error) -> Self {
        CliError::Input(err.to_string())
    }
}

/// Runs the interactive menu loop until the operator exits.
pub fn run_cli(data_dir: Option<PathBuf>) -> Result<(), CliError> {
    let store = match data_dir {
        Some(dir) => JsonStore::new(
            Some(dir),
            &CategorySet::default(),
            Box::<FixedDepthRetention>::default(),
        )?,
        None => JsonStore::new_default()?,
    };
    let mut manager = LedgerManager::new(store);
    let report = manager.load();
    for warning in &report.skipped {
        print_warning(warning);
    }

    loop {
        print_menu(&manager);
        let Some(choice) = prompt("Choice")? else {
            manager.save()?;
            return Ok(());
        };
        match choice.trim() {
            "1" => add_entry(&mut manager, TransactionKind::Income)?,
            "2" => add_entry(&mut manager, TransactionKind::Expense)?,
            "3" => view_all(&manager),
            "4" => filter_entries(&manager)?,
            "5" => monthly_report(&manager)?,
            "6" => category_summary(&manager),
            "7" => show_balance(&manager),
            "8" => delete_entry(&mut manager)?,
            "9" => export_csv(&mut manager)?,
            "10" => manage_categories(&mut manager)?,
            "0" => {
                manager.save()?;
                print_success("Goodbye!");
                return Ok(());
            }
            other => print_error(format!("unknown option `{other}`")),
        }
    }
}

/// Reads one answer. `None` means end of input, which callers treat as
/// cancel (or exit, at the top-level menu).
fn prompt(label: &str) -> Result<Option<String>, CliError> {
    if std::env::var_os("FINTRACK_CLI_SCRIPT").is_some() {
        let mut line = String::new();
        let read = std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|err| CliError::Input(err.to_string()))?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    } else {
        let answer: String = Input::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()?;
        Ok(Some(answer))
    }
}

fn print_menu(manager: &LedgerManager) {
    let rule = "=".repeat(MENU_WIDTH);
    println!("\n{rule}");
    println!("{:^width$}", "PERSONAL FINANCE TRACKER", width = MENU_WIDTH);
    println!("{rule}");
    println!("1.  Add Income");
    println!("2.  Add Expense");
    println!("3.  View All Transactions");
    println!("4.  Filter Transactions");
    println!("5.  Monthly Report");
    println!("6.  Category Summary");
    println!("7.  View Balance");
    println!("8.  Delete Transaction");
    println!("9.  Export to CSV");
    println!("10. Manage Categories");
    println!("0.  Exit");
    println!("{rule}");
    println!(
        "Balance: {}",
        format_currency(manager.ledger().balance()).bold()
    );
}

fn add_entry(manager: &mut LedgerManager, kind: TransactionKind) -> Result<(), CliError> {
    let Some(amount) = prompt("Amount")? else {
        return Ok(());
    };
    let amount: f64 = match amount.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            print_error("amount must be a number");
            return Ok(());
        }
    };

    let labels = manager.categories().labels(kind).to_vec();
    println!("\nCategories:");
    for (index, label) in labels.iter().enumerate() {
        println!("{}. {label}", index + 1);
    }
    let Some(category) = prompt("Category (number or name)")? else {
        return Ok(());
    };
    let category = match category.trim().parse::<usize>() {
        Ok(index) if (1..=labels.len()).contains(&index) => labels[index - 1].clone(),
        _ => category.trim().to_string(),
    };

    let Some(description) = prompt("Description")? else {
        return Ok(());
    };
    let Some(date) = prompt("Date (YYYY-MM-DD, empty for today)")? else {
        return Ok(());
    };
    let date = if date.trim().is_empty() {
        None
    } else {
        match NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                print_error("date must look like 2024-06-15");
                return Ok(());
            }
        }
    };

    match Transaction::new(kind, amount, category, description.trim().to_string(), date) {
        Ok(transaction) => {
            let line = transaction.to_string();
            manager.add_transaction(transaction)?;
            print_success(format!("added {line}"));
        }
        Err(err) => print_error(err),
    }
    Ok(())
}

fn view_all(manager: &LedgerManager) {
    let transactions = manager.ledger().all();
    if transactions.is_empty() {
        println!("No transactions yet.");
        return;
    }
    print_transactions(&transactions);
    let (income, expense) = manager.ledger().totals();
    println!(
        "\nIncome {} | Expenses {}",
        format_currency(income),
        format_currency(expense)
    );
}

fn filter_entries(manager: &LedgerManager) -> Result<(), CliError> {
    println!("1. By type  2. By category  3. By date range");
    let Some(choice) = prompt("Filter")? else {
        return Ok(());
    };
    let ledger = manager.ledger();
    let results = match choice.trim() {
        "1" => {
            let Some(kind) = prompt("Type (income/expense)")? else {
                return Ok(());
            };
            match kind.trim().to_lowercase().as_str() {
                "income" => ledger.by_kind(TransactionKind::Income),
                "expense" => ledger.by_kind(TransactionKind::Expense),
                other => {
                    print_error(format!("unknown type `{other}`"));
                    return Ok(());
                }
            }
        }
        "2" => {
            let Some(category) = prompt("Category")? else {
                return Ok(());
            };
            ledger.by_category(category.trim())
        }
        "3" => {
            let Some(start) = read_date("Start date (YYYY-MM-DD)")? else {
                return Ok(());
            };
            let Some(end) = read_date("End date (YYYY-MM-DD)")? else {
                return Ok(());
            };
            ledger.by_date_range(start, end)
        }
        other => {
            print_error(format!("unknown filter `{other}`"));
            return Ok(());
        }
    };
    if results.is_empty() {
        println!("No matching transactions.");
    } else {
        print_transactions(&results);
    }
    Ok(())
}

fn monthly_report(manager: &LedgerManager) -> Result<(), CliError> {
    let Some(month) = prompt("Month (1-12)")? else {
        return Ok(());
    };
    let Some(year) = prompt("Year")? else {
        return Ok(());
    };
    let (Ok(month), Ok(year)) = (month.trim().parse::<u32>(), year.trim().parse::<i32>()) else {
        print_error("month and year must be numbers");
        return Ok(());
    };
    match MonthlyReport::build(manager.ledger(), month, year) {
        Some(report) => println!("{}", report.render()),
        None => println!("No transactions for this month."),
    }
    Ok(())
}

fn category_summary(manager: &LedgerManager) {
    for kind in [TransactionKind::Income, TransactionKind::Expense] {
        let totals = manager.ledger().category_totals(Some(kind));
        if totals.is_empty() {
            continue;
        }
        let mut entries: Vec<_> = totals.into_iter().collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        println!("\n{}:", kind.label().to_uppercase());
        for (category, total) in entries {
            println!("  {:<18} {:>12}", category, format_currency(total));
        }
    }
}

fn show_balance(manager: &LedgerManager) {
    let (income, expense) = manager.ledger().totals();
    println!("Total Income:   {}", format_currency(income));
    println!("Total Expenses: {}", format_currency(expense));
    println!(
        "Balance:        {}",
        format_currency(manager.ledger().balance()).bold()
    );
}

fn delete_entry(manager: &mut LedgerManager) -> Result<(), CliError> {
    let transactions = manager.ledger().all();
    if transactions.is_empty() {
        println!("No transactions to delete.");
        return Ok(());
    }
    print_transactions(&transactions);
    let Some(choice) = prompt("Delete which number (empty to cancel)")? else {
        return Ok(());
    };
    if choice.trim().is_empty() {
        return Ok(());
    }
    match choice.trim().parse::<usize>() {
        Ok(index) if (1..=transactions.len()).contains(&index) => {
            let id = transactions[index - 1].id;
            if manager.delete_transaction(id) {
                print_success("transaction deleted");
            } else {
                print_warning("transaction was already gone");
            }
        }
        _ => print_error("not a listed number"),
    }
    Ok(())
}

fn export_csv(manager: &mut LedgerManager) -> Result<(), CliError> {
    let Some(file) = prompt("Export file")? else {
        return Ok(());
    };
    let file = if file.trim().is_empty() {
        "transactions.csv".to_string()
    } else {
        file.trim().to_string()
    };
    match manager.export_csv(PathBuf::from(&file).as_path()) {
        Ok(()) => print_success(format!("exported to {file}")),
        Err(err) => print_error(err),
    }
    Ok(())
}

fn manage_categories(manager: &mut LedgerManager) -> Result<(), CliError> {
    for kind in [TransactionKind::Income, TransactionKind::Expense] {
        println!(
            "{}: {}",
            kind.label(),
            manager.categories().labels(kind).join(", ")
        );
    }
    let Some(kind) = prompt("Add to which group (income/expense, empty to skip)")? else {
        return Ok(());
    };
    let kind = match kind.trim().to_lowercase().as_str() {
        "" => return Ok(()),
        "income" => TransactionKind::Income,
        "expense" => TransactionKind::Expense,
        other => {
            print_error(format!("unknown group `{other}`"));
            return Ok(());
        }
    };
    let Some(label) = prompt("New category")? else {
        return Ok(());
    };
    if label.trim().is_empty() {
        print_error("category name cannot be empty");
    } else if manager.add_category(kind, label.trim().to_string()) {
        print_success("category added");
    } else {
        print_warning("category already exists");
    }
    Ok(())
}

fn read_date(label: &str) -> Result<Option<NaiveDate>, CliError> {
    let Some(raw) = prompt(label)? else {
        return Ok(None);
    };
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => Ok(Some(date)),
        Err(_) => {
            print_error("date must look like 2024-06-15");
            Ok(None)
        }
    }
}

fn print_transactions(transactions: &[Transaction]) {
    for (index, transaction) in transactions.iter().enumerate() {
        println!("{:>3}. {transaction}", index + 1);
    }
}

fn print_success(message: impl std::fmt::Display) {
    println!("{}", message.to_string().bright_green());
}

fn print_warning(message: impl std::fmt::Display) {
    println!("{}", message.to_string().bright_yellow());
}

fn print_error(message: impl std::fmt::Display) {
    println!("{}", message.to_string().bright_red());
}
