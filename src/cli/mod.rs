use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::application::PrintingService;
use crate::domain::{PageSize, PaperStock, PrintJobRequest, PrintingLog};

pub mod logging;

/// printledger - Student print-job accounting
#[derive(Parser)]
#[command(name = "printledger")]
#[command(about = "Track student page quotas, printer paper stock and print jobs")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "PRINTLEDGER_DATABASE", default_value = "printledger.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Student management commands
    #[command(subcommand)]
    Student(StudentCommands),

    /// Printer management commands
    #[command(subcommand)]
    Printer(PrinterCommands),

    /// Submit a batch of print jobs
    Print {
        /// Batch file (stdin if omitted)
        input: Option<String>,

        /// Format: json, csv (default: from file extension, json for stdin)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// List printing logs
    Logs {
        /// Only show logs of this student code
        #[arg(long)]
        student: Option<String>,

        /// Output format: table, json
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Show one printing log
    #[command(name = "log")]
    ShowLog {
        /// Printing log ID
        id: String,
    },

    /// Delete printing logs
    Delete {
        /// Printing log IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Show a student's printing usage
    Usage {
        /// Student code
        code: String,
    },

    /// Export data to CSV or JSON
    Export {
        /// What to export: logs, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum StudentCommands {
    /// Register a new student
    Add {
        /// Student name
        name: String,

        /// Student code (must be unique)
        #[arg(short, long)]
        code: String,

        /// Initial page budget
        #[arg(short, long, default_value = "0")]
        pages: i64,
    },

    /// List all students
    List,

    /// Show student details
    Show {
        /// Student code
        code: String,
    },

    /// Add purchased pages to a student's budget
    Topup {
        /// Student code
        code: String,

        /// Pages to add
        pages: i64,
    },
}

#[derive(Subcommand)]
pub enum PrinterCommands {
    /// Register a new printer
    Add {
        /// Printer name
        name: String,

        /// Where the printer is
        #[arg(short, long)]
        location: Option<String>,

        /// A1 sheets loaded
        #[arg(long, default_value = "0")]
        a1: i64,

        /// A2 sheets loaded
        #[arg(long, default_value = "0")]
        a2: i64,

        /// A3 sheets loaded
        #[arg(long, default_value = "0")]
        a3: i64,

        /// A4 sheets loaded
        #[arg(long, default_value = "0")]
        a4: i64,
    },

    /// List all printers
    List,

    /// Show printer details
    Show {
        /// Printer ID
        id: String,
    },

    /// Load paper into a printer
    Restock {
        /// Printer ID
        id: String,

        /// Page size: A1, A2, A3, A4
        #[arg(short, long)]
        size: String,

        /// Sheets to add
        sheets: i64,
    },

    /// Remove printers that have never printed
    Remove {
        /// Printer IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        logging::init(self.verbose);

        match self.command {
            Commands::Init => {
                PrintingService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Student(student_cmd) => {
                let service = PrintingService::connect(&self.database).await?;
                run_student_command(&service, student_cmd).await?;
            }

            Commands::Printer(printer_cmd) => {
                let service = PrintingService::connect(&self.database).await?;
                run_printer_command(&service, printer_cmd).await?;
            }

            Commands::Print { input, format } => {
                let service = PrintingService::connect(&self.database).await?;
                let requests = read_batch(input.as_deref(), format.as_deref())?;
                run_print_command(&service, &requests).await?;
            }

            Commands::Logs { student, format } => {
                let service = PrintingService::connect(&self.database).await?;
                run_logs_command(&service, student.as_deref(), &format).await?;
            }

            Commands::ShowLog { id } => {
                let service = PrintingService::connect(&self.database).await?;
                let log = service.get_log(parse_id(&id, "printing log")?).await?;
                print_log_details(&log);
            }

            Commands::Delete { ids } => {
                let service = PrintingService::connect(&self.database).await?;
                let ids = ids
                    .iter()
                    .map(|id| parse_id(id, "printing log"))
                    .collect::<Result<Vec<_>>>()?;
                let removed = service.delete_logs(&ids).await?;
                println!("Deleted {} of {} printing log(s)", removed, ids.len());
            }

            Commands::Usage { code } => {
                let service = PrintingService::connect(&self.database).await?;
                run_usage_command(&service, &code).await?;
            }

            Commands::Export {
                export_type,
                output,
            } => {
                let service = PrintingService::connect(&self.database).await?;
                run_export_command(&service, &export_type, output.as_deref()).await?;
            }
        }

        Ok(())
    }
}

async fn run_student_command(service: &PrintingService, cmd: StudentCommands) -> Result<()> {
    match cmd {
        StudentCommands::Add { name, code, pages } => {
            let student = service.register_student(name, code, pages).await?;
            println!(
                "Registered student: {} ({}) with {} pages [{}]",
                student.name, student.code, student.paper_quantity, student.id
            );
        }

        StudentCommands::List => {
            let students = service.list_students().await?;
            if students.is_empty() {
                println!("No students found.");
            } else {
                println!("{:<12} {:<25} {:>8} {:<36}", "CODE", "NAME", "PAGES", "ID");
                println!("{}", "-".repeat(84));
                for student in students {
                    println!(
                        "{:<12} {:<25} {:>8} {:<36}",
                        student.code,
                        truncate(&student.name, 25),
                        student.paper_quantity,
                        student.id
                    );
                }
            }
        }

        StudentCommands::Show { code } => {
            let student = service.get_student_by_code(&code).await?;
            let settings = student.last_settings;
            println!("Student: {}", student.name);
            println!("  Code:        {}", student.code);
            println!("  ID:          {}", student.id);
            println!("  Pages left:  {}", student.paper_quantity);
            println!(
                "  Last used:   {} {} {}",
                settings.page_size,
                if settings.duplex { "duplex" } else { "simplex" },
                if settings.color { "color" } else { "mono" }
            );
        }

        StudentCommands::Topup { code, pages } => {
            let student = service.get_student_by_code(&code).await?;
            let student = service.add_paper(student.id, pages).await?;
            println!(
                "Added {} pages to {} (now {})",
                pages, student.code, student.paper_quantity
            );
        }
    }
    Ok(())
}

async fn run_printer_command(service: &PrintingService, cmd: PrinterCommands) -> Result<()> {
    match cmd {
        PrinterCommands::Add {
            name,
            location,
            a1,
            a2,
            a3,
            a4,
        } => {
            let printer = service
                .register_printer(name, location, PaperStock::new(a1, a2, a3, a4))
                .await?;
            println!("Registered printer: {} [{}]", printer.name, printer.id);
        }

        PrinterCommands::List => {
            let printers = service.list_printers().await?;
            if printers.is_empty() {
                println!("No printers found.");
            } else {
                println!(
                    "{:<20} {:>7} {:>7} {:>7} {:>7} {:<36}",
                    "NAME", "A1", "A2", "A3", "A4", "ID"
                );
                println!("{}", "-".repeat(89));
                for printer in printers {
                    println!(
                        "{:<20} {:>7} {:>7} {:>7} {:>7} {:<36}",
                        truncate(&printer.name, 20),
                        printer.stock.a1,
                        printer.stock.a2,
                        printer.stock.a3,
                        printer.stock.a4,
                        printer.id
                    );
                }
            }
        }

        PrinterCommands::Show { id } => {
            let printer = service.get_printer(parse_id(&id, "printer")?).await?;
            println!("Printer: {}", printer.name);
            println!("  ID:       {}", printer.id);
            if let Some(location) = &printer.location {
                println!("  Location: {}", location);
            }
            println!("  Paper left:");
            for size in PageSize::ALL {
                println!("    {}: {}", size, printer.stock.available(size));
            }
        }

        PrinterCommands::Restock { id, size, sheets } => {
            let size = PageSize::from_str(&size).ok_or_else(|| {
                anyhow::anyhow!("Invalid page size '{}'. Valid sizes: A1, A2, A3, A4", size)
            })?;
            let printer = service
                .restock_printer(parse_id(&id, "printer")?, size, sheets)
                .await?;
            println!(
                "Loaded {} {} sheets into {} (now {})",
                sheets,
                size,
                printer.name,
                printer.stock.available(size)
            );
        }

        PrinterCommands::Remove { ids } => {
            let ids = ids
                .iter()
                .map(|id| parse_id(id, "printer"))
                .collect::<Result<Vec<_>>>()?;
            let removed = service.delete_printers(&ids).await?;
            println!("Removed {} of {} printer(s)", removed, ids.len());
        }
    }
    Ok(())
}

fn read_batch(input: Option<&str>, format: Option<&str>) -> Result<Vec<PrintJobRequest>> {
    use crate::io::{read_batch_csv, read_batch_json};
    use std::fs::File;
    use std::io::{stdin, Read};

    let format = match (format, input) {
        (Some(f), _) => f.to_lowercase(),
        (None, Some(path)) if path.to_lowercase().ends_with(".csv") => "csv".to_string(),
        _ => "json".to_string(),
    };

    let reader: Box<dyn Read> = match input {
        Some(path) if path != "-" => {
            let file =
                File::open(path).with_context(|| format!("Failed to open input file: {}", path))?;
            Box::new(file)
        }
        _ => Box::new(stdin()),
    };

    match format.as_str() {
        "json" => read_batch_json(reader),
        "csv" => read_batch_csv(reader),
        _ => anyhow::bail!("Invalid batch format '{}'. Valid formats: json, csv", format),
    }
}

async fn run_print_command(service: &PrintingService, requests: &[PrintJobRequest]) -> Result<()> {
    let outcome = service.submit(requests).await?;

    for log in &outcome.logs {
        println!(
            "Recorded {} pages ({} {}) [{}]",
            log.total_pages,
            log.page_size,
            log.document_name.as_deref().unwrap_or("untitled"),
            log.id
        );
    }

    if outcome.is_complete() {
        println!("{}", outcome.message);
    } else {
        eprintln!(
            "Stopped after {} of {} job(s): {}",
            outcome.logs.len(),
            requests.len(),
            outcome.message
        );
    }
    Ok(())
}

async fn run_logs_command(
    service: &PrintingService,
    student_code: Option<&str>,
    format: &str,
) -> Result<()> {
    let logs = match student_code {
        Some(code) => {
            let student = service.get_student_by_code(code).await?;
            service.list_logs_for_student(student.id).await?
        }
        None => service.list_logs().await?,
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&logs)?),
        _ => print_log_table(&logs),
    }
    Ok(())
}

fn print_log_table(logs: &[PrintingLog]) {
    if logs.is_empty() {
        println!("No printing logs found.");
        return;
    }

    println!(
        "{:<17} {:<20} {:>6} {:>6} {:<4} {:>6} {:<10} {:<36}",
        "DATE", "DOCUMENT", "PAGES", "COPIES", "SIZE", "TOTAL", "STATUS", "ID"
    );
    println!("{}", "-".repeat(112));
    for log in logs {
        println!(
            "{:<17} {:<20} {:>6} {:>6} {:<4} {:>6} {:<10} {:<36}",
            log.created_at.format("%Y-%m-%d %H:%M"),
            truncate(log.document_name.as_deref().unwrap_or("-"), 20),
            log.document_pages,
            log.copies,
            log.page_size.as_str(),
            log.total_pages,
            log.status.as_str(),
            log.id
        );
    }
}

fn print_log_details(log: &PrintingLog) {
    println!("Printing log: {}", log.id);
    println!("  Created:   {}", log.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("  Student:   {}", log.student_id);
    println!("  Printer:   {}", log.printer_id);
    if let Some(name) = &log.document_name {
        println!("  Document:  {}", name);
    }
    println!(
        "  Request:   {} pages x {} copies, {}, {}, {}",
        log.document_pages,
        log.copies,
        log.page_size,
        if log.duplex { "duplex" } else { "simplex" },
        if log.color { "color" } else { "mono" }
    );
    println!("  Total:     {} pages", log.total_pages);
    println!("  Status:    {}", log.status);
}

async fn run_usage_command(service: &PrintingService, code: &str) -> Result<()> {
    let student = service.get_student_by_code(code).await?;
    let usage = service.student_usage(student.id).await?;

    println!("Usage for {} ({})", usage.student.name, usage.student.code);
    println!("  Jobs:          {}", usage.job_count);
    println!("  Pages printed: {}", usage.pages_printed);
    println!("  Pages left:    {}", usage.student.paper_quantity);
    if !usage.logs.is_empty() {
        println!();
        print_log_table(&usage.logs);
    }
    Ok(())
}

async fn run_export_command(
    service: &PrintingService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{stdout, Write};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "logs" => {
            let count = exporter.export_logs_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} printing logs", count);
            }
        }
        "full" => {
            let snapshot = exporter.export_full_json(writer).await?;
            if output.is_some() {
                eprintln!(
                    "Exported full database: {} students, {} printers, {} printing logs",
                    snapshot.students.len(),
                    snapshot.printers.len(),
                    snapshot.logs.len()
                );
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: logs, full",
                export_type
            );
        }
    }

    Ok(())
}

fn parse_id(id: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(id).with_context(|| format!("Invalid {} ID format (expected UUID): {}", what, id))
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
