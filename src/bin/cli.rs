use std::io::{self, Write};
use chrono::{Datelike, Local, NaiveDate};
use polars::prelude::{AnyValue, DataFrame};
use shift_calendar::calendar::{CalendarMonth, first_of_month, next_month, previous_month};
use shift_calendar::codec::parse_date;
use shift_calendar::{
    AppConfig, CalendarError, ShiftSchedule, build_calendar_month, build_calendar_year,
    day_in_cycle, is_working_day, logging, next_working_day, parse_schedule_url,
    save_month_to_csv, schedule_url,
};

const WEEKDAY_HEADERS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

fn cell_text(av: &AnyValue) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::Boolean(v) => if *v { "yes".to_string() } else { String::new() },
        AnyValue::String(s) => s.to_string(),
        _ => av.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    // Compute column widths
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for (ci, col) in columns.iter().enumerate() {
        for row_idx in 0..df.height() {
            if let Ok(ref av) = col.get(row_idx) {
                let s = cell_text(av);
                if s.len() > widths[ci] {
                    widths[ci] = s.len();
                }
            }
        }
    }

    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');

    out.push('|');
    for (i, name) in col_names.iter().enumerate() {
        out.push(' ');
        out.push_str(name);
        out.push_str(&" ".repeat(widths[i] - name.len()));
        out.push_str(" |");
    }
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');

    for row_idx in 0..df.height() {
        out.push('|');
        for (ci, col) in columns.iter().enumerate() {
            let s = col.get(row_idx).map(|av| cell_text(&av)).unwrap_or_default();
            out.push(' ');
            out.push_str(&s);
            out.push_str(&" ".repeat(widths[ci].saturating_sub(s.len())));
            out.push_str(" |");
        }
        out.push('\n');
    }

    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_month(month: &CalendarMonth, schedule: &ShiftSchedule) -> String {
    let mut out = String::new();
    if let Some(name) = schedule.name() {
        out.push_str(name);
        out.push('\n');
    }
    out.push_str(&format!("{}\n", month.first_day().format("%B %Y")));
    for header in WEEKDAY_HEADERS {
        out.push_str(&format!(" {header}  "));
    }
    out.push('\n');

    for week in month.weeks() {
        for cell in week {
            let day = cell.date.day();
            let token = if !cell.in_target_month {
                format!("({day:>2})")
            } else if cell.is_working {
                format!("[{day:>2}]")
            } else {
                format!(" {day:>2} ")
            };
            out.push_str(&token);
            out.push(if cell.is_today { '*' } else { ' ' });
        }
        out.push('\n');
    }
    out.push_str(&format!(
        "[n] working  n rest  (n) other month  * today | {} working days\n",
        month.working_days()
    ));
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  new <YYYY-MM-DD> <work> <rest> [name...]\n                                     Create a schedule (work/rest 1-365)\n  open <url|query>                   Load a schedule from a shared link\n  show                               Show the current month\n  next | prev                        Move one month forward/back\n  month <YYYY-MM>                    Jump to a month\n  today <YYYY-MM-DD>                 Override the reference day\n  day <YYYY-MM-DD>                   Classify a single day\n  year <YYYY>                        Working days per month\n  link                               Print the shareable link\n  table                              Show the month as a table\n  export <path>                      Write the month to CSV\n  quit|exit                          Exit"
    );
}

struct Session {
    schedule: Option<ShiftSchedule>,
    anchor: NaiveDate,
    today: NaiveDate,
    base_url: String,
}

impl Session {
    fn month(&self) -> Option<Result<(CalendarMonth, &ShiftSchedule), CalendarError>> {
        self.schedule.as_ref().map(|schedule| {
            build_calendar_month(schedule, self.anchor, self.today).map(|month| (month, schedule))
        })
    }

    fn show(&self) {
        match self.month() {
            Some(Ok((month, schedule))) => println!("{}", render_month(&month, schedule)),
            Some(Err(e)) => println!("Error: {}", e),
            None => println!("No schedule. Use 'new' or 'open'."),
        }
    }

    fn step(&mut self, target: Option<NaiveDate>) {
        match target {
            Some(anchor) => {
                self.anchor = anchor;
                self.show();
            }
            None => println!("Error: no month beyond {}", self.anchor.format("%Y-%m")),
        }
    }
}

fn main() {
    let config = AppConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Config error: {e}; using defaults");
        AppConfig::default()
    });
    logging::init(config.verbosity);

    let today = Local::now().date_naive();
    let mut session = Session {
        schedule: None,
        anchor: first_of_month(today),
        today,
        base_url: config.base_url,
    };

    println!("Shift Calendar (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() { continue; }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "new" => {
                let start_s = parts.next();
                let work_s = parts.next();
                let rest_s = parts.next();
                let name = parts.collect::<Vec<_>>().join(" ");
                match (start_s, work_s, rest_s) {
                    (Some(start_s), Some(work_s), Some(rest_s)) => {
                        let start = match parse_date(start_s) { Some(d) => d, None => { println!("Invalid date (YYYY-MM-DD)"); continue; } };
                        let work: i64 = match work_s.parse() { Ok(v) => v, Err(_) => { println!("Invalid work days"); continue; } };
                        let rest: i64 = match rest_s.parse() { Ok(v) => v, Err(_) => { println!("Invalid rest days"); continue; } };
                        match ShiftSchedule::new(start, work, rest) {
                            Ok(schedule) => {
                                session.schedule = Some(schedule.with_name(name));
                                println!("Schedule created.");
                                session.show();
                            }
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!("Usage: new <YYYY-MM-DD> <work> <rest> [name...]"),
                }
            }
            "open" => {
                let rest: Vec<&str> = parts.collect();
                if rest.is_empty() {
                    println!("Usage: open <url|query>");
                    continue;
                }
                match parse_schedule_url(&rest.join(" ")) {
                    Ok(schedule) => {
                        session.schedule = Some(schedule);
                        println!("Schedule loaded.");
                        session.show();
                    }
                    Err(e) => println!("Invalid schedule parameters: {}", e),
                }
            }
            "show" => session.show(),
            "next" => session.step(next_month(session.anchor)),
            "prev" => session.step(previous_month(session.anchor)),
            "month" => match parts.next().and_then(|m| parse_date(&format!("{m}-01"))) {
                Some(first) => {
                    session.anchor = first;
                    session.show();
                }
                None => println!("Usage: month <YYYY-MM>"),
            },
            "today" => match parts.next().and_then(parse_date) {
                Some(date) => {
                    session.today = date;
                    println!("Reference day set to {}.", date);
                }
                None => println!("Usage: today <YYYY-MM-DD>"),
            },
            "day" => {
                let Some(schedule) = session.schedule.as_ref() else {
                    println!("No schedule. Use 'new' or 'open'.");
                    continue;
                };
                match parts.next().and_then(parse_date) {
                    Some(date) => {
                        let status = if is_working_day(schedule, date) { "working" } else { "rest" };
                        let next = next_working_day(schedule, date)
                            .map_or_else(|| "out of range".to_string(), |next| next.to_string());
                        match day_in_cycle(schedule, date) {
                            Some(day) => println!(
                                "{}: {} (day {} of {}), next working day {}",
                                date,
                                status,
                                day + 1,
                                schedule.cycle_length(),
                                next
                            ),
                            None => println!(
                                "{}: {} (before start {})",
                                date,
                                status,
                                schedule.start_date()
                            ),
                        }
                    }
                    None => println!("Usage: day <YYYY-MM-DD>"),
                }
            }
            "year" => {
                let Some(schedule) = session.schedule.as_ref() else {
                    println!("No schedule. Use 'new' or 'open'.");
                    continue;
                };
                let year = match parts.next().map(str::parse::<i32>) {
                    Some(Ok(y)) => y,
                    None => session.anchor.year(),
                    Some(Err(_)) => { println!("Usage: year <YYYY>"); continue; }
                };
                let months = match build_calendar_year(schedule, year, session.today) {
                    Ok(months) => months,
                    Err(e) => { println!("Error: {}", e); continue; }
                };
                let mut total = 0;
                for month in &months {
                    total += month.working_days();
                    println!("{:<10} {:>3}", month.first_day().format("%B"), month.working_days());
                }
                println!("{:<10} {:>3}", year, total);
            }
            "link" => match session.schedule.as_ref() {
                Some(schedule) => println!("{}", schedule_url(&session.base_url, schedule)),
                None => println!("No schedule. Use 'new' or 'open'."),
            },
            "table" => match session.month() {
                Some(Ok((month, _))) => match month.to_dataframe() {
                    Ok(df) => println!("{}", render_df_as_text_table(&df)),
                    Err(e) => println!("Error: {}", e),
                },
                Some(Err(e)) => println!("Error: {}", e),
                None => println!("No schedule. Use 'new' or 'open'."),
            },
            "export" => {
                let Some(path) = parts.next() else {
                    println!("Usage: export <path>");
                    continue;
                };
                match session.month() {
                    Some(Ok((month, _))) => match save_month_to_csv(&month, path) {
                        Ok(_) => println!("Month exported to {}", path),
                        Err(e) => println!("Export error: {}", e),
                    },
                    Some(Err(e)) => println!("Error: {}", e),
                    None => println!("No schedule. Use 'new' or 'open'."),
                }
            }
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
}
