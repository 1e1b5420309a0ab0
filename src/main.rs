use chrono::{Local, NaiveDate};
use clap::Parser;
use colored::Colorize;
use flightdesk::authorization::{Candidates, FilterEvent, FilterMode, FilterSession, SelectionFilter};
use flightdesk::availability::Resource;
use flightdesk::booking::BookingRequest;
use flightdesk::flight::{Flight, FlightStatus, FlightType};
use flightdesk::grid::TimeGrid;
use flightdesk::instructor::Authorization;
use flightdesk::logger;
use flightdesk::schedule::schedule::Schedule;
use flightdesk::slots::SlotAggregator;
use flightdesk::time::Time;
use flightdesk::timeline::{RangeSelection, Timeline, is_slot_in_past};
use log::LevelFilter;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::error::Error;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

type CmdResult = Result<(), Box<dyn Error>>;

#[derive(Parser)]
#[command(version, about = "Flight school booking desk")]
struct Args {
    /// Path to the JSON scenario file
    #[arg(short, long, value_name = "FILE", default_value = "data/default.json")]
    scenario: PathBuf,

    /// Day to work on (YYYY-MM-DD), today when omitted
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// Requested window length in minutes
    #[arg(short, long, value_name = "MINUTES")]
    window: Option<u32>,

    /// Grid step in minutes
    #[arg(long, value_name = "MINUTES")]
    step: Option<u32>,

    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,

    /// Also write log records to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: format!("{} ", cmd),
            })
            .collect();

        Ok((0, candidates))
    }
}

fn paginate(content: String) {
    if !std::io::stdout().is_terminal() {
        println!("{}", content);
        return;
    }
    let pager = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        // Fallback to 'more' if 'less' isn't available
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn());

    let Ok(mut pager) = pager else {
        println!("{}", content);
        return;
    };

    if let Some(mut stdin) = pager.stdin.take() {
        if let Err(e) = stdin.write_all(content.as_bytes()) {
            // Broken pipe is common if the user quits the pager early
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                eprintln!("Error writing to pager: {}", e);
            }
        }
    }

    // Wait for the user to close the pager before returning to the ">> " prompt
    let _ = pager.wait();
}

fn print_table(table: &mut Table, rows: usize) {
    table.with(Style::rounded());
    table.with(tabled::settings::Alignment::left());
    if rows > 20 {
        paginate(table.to_string());
    } else {
        println!("{}", table);
    }
}

#[derive(Tabled)]
struct FlightRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Aircraft")]
    aircraft: String,
    #[tabled(rename = "Instructor")]
    instructor: String,
    #[tabled(rename = "Student")]
    student: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Hobbs")]
    hobbs: String,
}

impl From<&Flight> for FlightRow {
    fn from(f: &Flight) -> Self {
        let status = match f.status {
            FlightStatus::Scheduled => f.status.to_string().green().to_string(),
            FlightStatus::Completed => f.status.to_string().blue().to_string(),
            FlightStatus::Cancelled => match &f.cancel_reason {
                Some(reason) => format!("{} ({})", "cancelled".red(), reason),
                None => "cancelled".red().to_string(),
            },
        };
        FlightRow {
            id: f.id.to_string(),
            date: f.date.to_string(),
            time: f.range().to_string(),
            aircraft: f.aircraft.to_string(),
            instructor: f.instructor.to_string(),
            student: f.student.clone(),
            kind: f.kind.to_string(),
            status,
            hobbs: f.hobbs_time.map(|h| format!("{:.1}", h)).unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct WindowRow {
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Hours")]
    hours: String,
}

#[derive(Tabled)]
struct TimelineRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Flights")]
    flights: String,
    #[tabled(rename = "Free aircraft")]
    free_aircraft: usize,
    #[tabled(rename = "Free instructors")]
    free_instructors: usize,
}

struct Desk {
    schedule: Schedule,
    date: NaiveDate,
    grid: TimeGrid,
    aggregator: SlotAggregator,
    session: FilterSession,
    filter: SelectionFilter,
    selection: RangeSelection,
}

impl Desk {
    fn ls(&self, sub: Option<&str>) {
        let flights: Vec<FlightRow> = self
            .schedule
            .flights()
            .iter()
            .filter(|f| match sub.unwrap_or("a") {
                "s" | "scheduled" => f.status == FlightStatus::Scheduled,
                "c" | "completed" => f.status == FlightStatus::Completed,
                "x" | "cancelled" => f.status == FlightStatus::Cancelled,
                "d" | "day" => f.is_on(self.date),
                _ => true, // 'ls' or 'ls a'
            })
            .map(FlightRow::from)
            .collect();
        if flights.is_empty() {
            println!("No matching flights found.");
        } else {
            let rows = flights.len();
            print_table(&mut Table::new(flights), rows);
        }
    }

    fn aircraft(&self) {
        let mut builder = Builder::default();
        builder.push_record(["Registration", "Type", "Name", "Status", "Hobbs"]);
        for ac in self.schedule.catalog.aircraft() {
            let status = if ac.is_bookable() {
                ac.status.to_string().green()
            } else {
                ac.status.to_string().red()
            };
            builder.push_record([
                ac.registration.to_string(),
                ac.kind.clone(),
                ac.name.clone(),
                status.to_string(),
                ac.hobbs_time.map(|h| format!("{:.1}", h)).unwrap_or_default(),
            ]);
        }
        let rows = self.schedule.catalog.aircraft().len();
        print_table(&mut builder.build(), rows);
    }

    fn instructors(&self) {
        let mut builder = Builder::default();
        builder.push_record(["ID", "Name", "Certifications", "Available", "Authorized aircraft"]);
        for i in self.schedule.catalog.instructors() {
            let authorized = match &i.authorized_aircraft {
                Authorization::Unrestricted => "any".to_string(),
                Authorization::RestrictedTo(set) if set.is_empty() => {
                    "none".red().to_string()
                }
                Authorization::RestrictedTo(set) => {
                    set.iter().map(|r| r.to_string()).collect::<Vec<_>>().join(", ")
                }
            };
            builder.push_record([
                i.id.to_string(),
                i.name.to_string(),
                i.certifications.join(", "),
                if i.available { "yes".green().to_string() } else { "no".red().to_string() },
                authorized,
            ]);
        }
        let rows = self.schedule.catalog.instructors().len();
        print_table(&mut builder.build(), rows);
    }

    fn instructor(&self, parts: &[&str]) -> CmdResult {
        if parts.len() < 2 {
            return Err("Usage: instructor <id|name>".into());
        }
        let key = parts[1..].join(" ");
        let instructor = self
            .schedule
            .catalog
            .find_instructor(&key)
            .ok_or_else(|| format!("unknown instructor {}", key))?;

        println!("{} ({})", instructor.name.to_string().bold(), instructor.id);
        println!("  Certifications: {}", instructor.certifications.join(", "));
        println!(
            "  Available:      {}",
            if instructor.available { "yes".green() } else { "no".red() }
        );
        println!("  Phone:          {}", instructor.phone.as_deref().unwrap_or("-"));
        println!("  Email:          {}", instructor.email.as_deref().unwrap_or("-"));
        if instructor.training_capabilities.is_empty() {
            println!("  Training:       -");
        } else {
            println!("  Training:");
            for capability in &instructor.training_capabilities {
                println!("    - {}", capability);
            }
        }
        let authorized = match &instructor.authorized_aircraft {
            Authorization::Unrestricted => "any".to_string(),
            Authorization::RestrictedTo(set) if set.is_empty() => "none".to_string(),
            Authorization::RestrictedTo(set) => set.iter().map(|r| r.to_string()).collect::<Vec<_>>().join(", "),
        };
        println!("  Aircraft:       {}", authorized);

        let resource = Resource::Instructor(instructor.name.clone());
        let booked = self.schedule.index(self.date).schedule_for(&resource);
        println!("  Flights on {}: {}", self.date, booked.len());
        Ok(())
    }

    fn resource(&self, kind: &str, key: &str) -> Result<Resource, Box<dyn Error>> {
        match kind {
            "aircraft" | "a" => self
                .schedule
                .catalog
                .aircraft_by_registration(key)
                .map(|ac| Resource::Aircraft(ac.registration.clone()))
                .ok_or_else(|| format!("unknown aircraft {}", key).into()),
            "instructor" | "i" => self
                .schedule
                .catalog
                .find_instructor(key)
                .map(|i| Resource::Instructor(i.name.clone()))
                .ok_or_else(|| format!("unknown instructor {}", key).into()),
            _ => Err("Usage: avail <aircraft|instructor> <key>".into()),
        }
    }

    fn avail(&self, parts: &[&str]) -> CmdResult {
        let (Some(kind), Some(key)) = (parts.get(1), parts.get(2)) else {
            return Err("Usage: avail <aircraft|instructor> <key>".into());
        };
        let resource = self.resource(kind, key)?;
        let index = self.schedule.index(self.date);
        let booked = index.schedule_for(&resource);

        println!("{} on {}", resource.to_string().bold(), self.date);
        if booked.is_empty() {
            println!("  free all day");
        }
        for f in booked {
            println!("  {} {} ({}, {})", f.range(), f.id, f.student, f.kind);
        }
        match index.first_open_slot(&resource, &self.grid, None) {
            Some(slot) => println!("  first open slot {}", slot.to_12h().green()),
            None => println!("  {}", "no open slot on the grid".red()),
        }
        Ok(())
    }

    fn filter(&mut self, parts: &[&str]) -> CmdResult {
        let catalog = &self.schedule.catalog;
        let event = match parts.get(1).copied() {
            Some("mode") => match parts.get(2).copied() {
                Some("aircraft" | "a") => FilterEvent::ChooseMode(FilterMode::AircraftFirst),
                Some("instructor" | "i") => FilterEvent::ChooseMode(FilterMode::InstructorFirst),
                _ => return Err("Usage: filter mode <aircraft|instructor>".into()),
            },
            Some("pick") => {
                let Some(key) = parts.get(2) else {
                    return Err("Usage: filter pick <registration|instructor>".into());
                };
                if let Some(ac) = catalog.aircraft_by_registration(key) {
                    FilterEvent::ToggleAircraft(ac.registration.clone())
                } else if let Some(i) = catalog.find_instructor(key) {
                    FilterEvent::ToggleInstructor(i.id.clone())
                } else {
                    return Err(format!("nothing named {}", key).into());
                }
            }
            Some("next") => FilterEvent::Confirm,
            Some("back") => FilterEvent::Back,
            Some("apply") => FilterEvent::Apply,
            Some("cancel") => FilterEvent::Cancel,
            Some("clear") => {
                self.session = FilterSession::default();
                self.filter = SelectionFilter::default();
                println!("Filter cleared.");
                return Ok(());
            }
            Some("show") | None => {
                self.show_filter();
                return Ok(());
            }
            Some(other) => return Err(format!("unknown filter step {}", other).into()),
        };

        let next = self.session.next(&event, catalog)?;
        match next {
            FilterSession::Applied(filter) => {
                println!(
                    "Filter applied: {} aircraft, {} instructors.",
                    filter.aircraft.len(),
                    filter.instructors.len()
                );
                self.filter = filter;
                self.session = FilterSession::default();
            }
            FilterSession::Cancelled => {
                println!("Filter selection cancelled.");
                self.session = FilterSession::default();
            }
            next => {
                self.session = next;
                self.show_filter();
            }
        }
        Ok(())
    }

    fn show_filter(&self) {
        let catalog = &self.schedule.catalog;
        println!("Filter step: {}", self.session.to_string().bold());
        if let Some(selection) = self.session.selection() {
            println!(
                "  picked: {}",
                selection
                    .aircraft
                    .iter()
                    .map(|r| r.to_string())
                    .chain(
                        selection
                            .instructors
                            .iter()
                            .filter_map(|id| catalog.instructor_by_id(id))
                            .map(|i| i.name.to_string())
                    )
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        match self.session.candidates(catalog) {
            Candidates::Nothing => {}
            Candidates::Aircraft(list) => {
                println!("  candidates: {}", list.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", "))
            }
            Candidates::Instructors(list) => println!(
                "  candidates: {}",
                list.iter().map(|i| format!("{} ({})", i.name, i.id)).collect::<Vec<_>>().join(", ")
            ),
        }
        if self.filter.is_empty() {
            println!("  active filter: none");
        } else {
            println!(
                "  active filter: {} aircraft, {} instructors",
                self.filter.aircraft.len(),
                self.filter.instructors.len()
            );
        }
    }

    fn slots(&self) -> CmdResult {
        let windows = self.aggregator.aggregate(
            &self.schedule.catalog,
            self.schedule.flights(),
            self.date,
            &self.filter,
        )?;
        let Some(windows) = windows else {
            println!("No filter applied. Use `filter mode ...` to pick resources first.");
            return Ok(());
        };
        let rows: Vec<WindowRow> = windows
            .map(|w| WindowRow {
                start: w.start_time.to_12h(),
                end: w.end_time.to_12h(),
                hours: format!("{:.1}", w.duration_hours),
            })
            .collect();
        if rows.is_empty() {
            println!("No available {}-minute windows on {}.", self.aggregator.window_minutes(), self.date);
        } else {
            let count = rows.len();
            print_table(&mut Table::new(rows), count);
        }
        Ok(())
    }

    fn grid(&self) -> CmdResult {
        let rows = self.aggregator.aircraft_grid(
            &self.schedule.catalog,
            self.schedule.flights(),
            self.date,
            &self.filter,
        )?;
        if self.filter.aircraft.is_empty() {
            println!("Pick at least one aircraft with `filter` to see the grid.");
            return Ok(());
        }
        let mut builder = Builder::default();
        builder.push_record(
            std::iter::once("Time".to_string()).chain(self.filter.aircraft.iter().map(|r| r.to_string())),
        );
        for row in &rows {
            let cells = row.cells.iter().map(|cell| {
                if cell.selectable {
                    cell.instructors
                        .iter()
                        .map(|i| i.name.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                        .green()
                        .to_string()
                } else {
                    "-".dimmed().to_string()
                }
            });
            builder.push_record(std::iter::once(row.slot.to_12h()).chain(cells));
        }
        print_table(&mut builder.build(), rows.len());
        Ok(())
    }

    fn timeline(&self) {
        let now = Local::now().naive_local();
        let timeline = Timeline::new(self.grid, &self.schedule.catalog, self.schedule.flights(), self.date);
        let step = self.grid.step();
        let rows: Vec<TimelineRow> = timeline
            .summary(&self.filter)
            .into_iter()
            .map(|s| {
                let mut time = s.slot.to_12h();
                if self.selection.contains(s.slot, step) {
                    time = time.reversed().to_string();
                } else if is_slot_in_past(self.date, s.slot, now) {
                    time = time.dimmed().to_string();
                }
                TimelineRow {
                    time,
                    flights: s
                        .flights
                        .iter()
                        .map(|f| format!("{} {}/{}", f.id, f.aircraft, f.instructor))
                        .collect::<Vec<_>>()
                        .join(", "),
                    free_aircraft: s.free_aircraft,
                    free_instructors: s.free_instructors,
                }
            })
            .collect();
        let count = rows.len();
        print_table(&mut Table::new(rows), count);
    }

    fn pick(&mut self, parts: &[&str]) -> CmdResult {
        let Some(slot) = parts.get(1) else {
            return Err("Usage: pick <HH:MM>".into());
        };
        let slot: Time = slot.parse()?;
        if !self.grid.contains(slot) {
            return Err(format!("{} is not on the {}-minute grid", slot, self.grid.step()).into());
        }
        self.selection = self.selection.press(slot, self.grid.step());
        match self.selection {
            RangeSelection::Selected(range) => println!("Selected {}.", range),
            RangeSelection::Pending { start } => println!("Selected {}, pick an end slot.", start),
            RangeSelection::Idle => {}
        }
        Ok(())
    }

    fn book(&mut self, parts: &[&str]) -> CmdResult {
        const USAGE: &str = "Usage: book <aircraft> <instructor> [<start> <end|+hours>] [type] [student]";
        let (Some(aircraft), Some(instructor)) = (parts.get(1), parts.get(2)) else {
            return Err(USAGE.into());
        };
        let instructor = self
            .schedule
            .catalog
            .find_instructor(instructor)
            .map(|i| i.name.clone())
            .unwrap_or_else(|| Arc::from(*instructor));

        let (start, end, rest) = match (parts.get(3), parts.get(4)) {
            (Some(start), Some(end)) if start.contains(':') => {
                let start: Time = start.parse()?;
                let end = match end.strip_prefix('+') {
                    Some(hours) => BookingRequest::end_after(start, hours.parse()?)?,
                    None => end.parse()?,
                };
                (start, end, &parts[5..])
            }
            _ => match self.selection.selected() {
                Some(range) => (range.start, range.end, &parts[3..]),
                None => return Err(USAGE.into()),
            },
        };
        let kind: FlightType = match rest.first() {
            Some(kind) => kind.parse()?,
            None => FlightType::Dual,
        };
        let student = if rest.len() > 1 { rest[1..].join(" ") } else { "Student".to_string() };

        let request = BookingRequest {
            date: self.date,
            start_time: start,
            end_time: end,
            aircraft: Arc::from(*aircraft),
            instructor,
            student,
            kind,
            flight_category: None,
        };
        let flight = self.schedule.book(request)?;
        println!("{} {}", "Booked".green().bold(), flight);
        self.selection = RangeSelection::Idle;
        Ok(())
    }

    fn cancel(&mut self, line: &str, parts: &[&str]) -> CmdResult {
        let Some(id) = parts.get(1) else {
            return Err("Usage: cancel <id> <reason> [-- comments]".into());
        };
        let rest = line
            .splitn(3, char::is_whitespace)
            .nth(2)
            .unwrap_or_default();
        let (reason, comments) = match rest.split_once("--") {
            Some((reason, comments)) => (reason.trim(), Some(comments.trim().to_string())),
            None => (rest.trim(), None),
        };
        self.schedule.cancel(id, reason, comments)?;
        println!("Flight {} cancelled.", id);
        Ok(())
    }

    fn edit(&mut self, parts: &[&str]) -> CmdResult {
        let (Some(id), Some(start), Some(end)) = (parts.get(1), parts.get(2), parts.get(3)) else {
            return Err("Usage: edit <id> <start> <end>".into());
        };
        self.schedule.reschedule(id, start.parse()?, end.parse()?)?;
        println!("Flight {} moved to {}-{}.", id, start, end);
        Ok(())
    }

    fn hobbs(&mut self, parts: &[&str]) -> CmdResult {
        let (Some(id), Some(hours)) = (parts.get(1), parts.get(2)) else {
            return Err("Usage: hobbs <id> <hours>".into());
        };
        self.schedule.record_hobbs(id, hours.parse()?)?;
        println!("Recorded {} hobbs hours on {}.", hours, id);
        Ok(())
    }

    fn done(&mut self, parts: &[&str]) -> CmdResult {
        let Some(id) = parts.get(1) else {
            return Err("Usage: done <id>".into());
        };
        self.schedule.complete(id)?;
        println!("Flight {} completed.", id);
        Ok(())
    }

    fn stats(&self, parts: &[&str]) -> CmdResult {
        let previous: f64 = match parts.get(1) {
            Some(hours) => hours.parse()?,
            None => 0.0,
        };
        let stats = self.schedule.stats();
        println!("Flights:   {}", stats.total());
        println!("Scheduled: {}", stats.scheduled.to_string().green());
        println!("Completed: {}", stats.completed.to_string().blue());
        println!("Cancelled: {}", stats.cancelled.to_string().red());
        println!("Upcoming:  {}", self.schedule.upcoming(self.date).len());
        println!("Total hours: {:.1}", self.schedule.total_hours(previous));
        Ok(())
    }
}

fn help() {
    println!("\nAvailable Commands:");
    println!("  ls [a|s|c|x|d]           - List flights: all, scheduled, completed, cancelled (x) or on the current day (d)");
    println!("  aircraft                 - List the fleet");
    println!("  instructors              - List instructors and their authorized aircraft");
    println!("  instructor <id|name>     - Show an instructor's profile and contact details");
    println!("  date [YYYY-MM-DD]        - Show or change the working day");
    println!("  avail <a|i> <key>        - Show an aircraft's or instructor's bookings for the day");
    println!("  filter mode <a|i>        - Start picking resources aircraft-first or instructor-first");
    println!("  filter pick <key>        - Toggle an aircraft or instructor in the current step");
    println!("  filter next|back         - Move between the primary and secondary step");
    println!("  filter apply|cancel      - Finish or abandon the selection");
    println!("  filter show|clear        - Show the selection or drop the active filter");
    println!("  slots                    - List windows where every filtered resource is free");
    println!("  grid                     - Availability grid for the filtered aircraft");
    println!("  timeline                 - Per-slot flights and free resources");
    println!("  pick <HH:MM>             - Press a slot; two presses select a range");
    println!("  book <ac> <instr> [s e]  - Book a flight, times default to the picked range");
    println!("  cancel <id> <reason>     - Cancel a flight, add comments after --");
    println!("  edit <id> <start> <end>  - Move a flight to new times");
    println!("  hobbs <id> <hours>       - Record hobbs time");
    println!("  done <id>                - Mark a flight completed");
    println!("  stats [previous hours]   - Flight counts and total hours");
    println!("  help / ?                 - Show this help menu");
    println!("  exit / quit              - Leave the desk\n");
}

fn run(args: Args) -> CmdResult {
    logger::init(args.log_level, args.log_file.as_deref())?;

    let mut schedule = Schedule::load_from_file(&args.scenario)?;
    if let Some(window) = args.window {
        schedule.settings.window_minutes = window;
    }
    if let Some(step) = args.step {
        schedule.settings.grid.step_minutes = step;
    }
    let grid = schedule.settings.time_grid()?;
    let aggregator = schedule.settings.aggregator()?;
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());

    println!(
        "Desk open for {}. Loaded {} flights from {}",
        date,
        schedule.flights().len(),
        args.scenario.display()
    );

    let mut desk = Desk {
        schedule,
        date,
        grid,
        aggregator,
        session: FilterSession::default(),
        filter: SelectionFilter::default(),
        selection: RangeSelection::default(),
    };

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: [
            "ls", "aircraft", "instructors", "instructor", "date", "avail", "filter", "slots", "grid", "timeline",
            "pick", "book", "cancel", "edit", "hobbs", "done", "stats", "help", "exit",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect(),
    };

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                let result: CmdResult = match parts[0] {
                    "ls" => {
                        desk.ls(parts.get(1).copied());
                        Ok(())
                    }
                    "aircraft" => {
                        desk.aircraft();
                        Ok(())
                    }
                    "instructors" => {
                        desk.instructors();
                        Ok(())
                    }
                    "date" => match parts.get(1) {
                        Some(day) => day.parse::<NaiveDate>().map_err(Into::into).map(|day| {
                            desk.date = day;
                            desk.selection = RangeSelection::Idle;
                            println!("Working on {}.", day);
                        }),
                        None => {
                            println!("Working on {}.", desk.date);
                            Ok(())
                        }
                    },
                    "instructor" => desk.instructor(&parts),
                    "avail" => desk.avail(&parts),
                    "filter" => desk.filter(&parts),
                    "slots" => desk.slots(),
                    "grid" => desk.grid(),
                    "timeline" => {
                        desk.timeline();
                        Ok(())
                    }
                    "pick" => desk.pick(&parts),
                    "book" => desk.book(&parts),
                    "cancel" => desk.cancel(trimmed, &parts),
                    "edit" => desk.edit(&parts),
                    "hobbs" => desk.hobbs(&parts),
                    "done" => desk.done(&parts),
                    "stats" => desk.stats(&parts),
                    "help" | "?" => {
                        help();
                        Ok(())
                    }
                    "exit" | "quit" => break,
                    _ => {
                        println!("Unknown command: {}", parts[0]);
                        Ok(())
                    }
                };
                if let Err(e) = result {
                    println!("{} {}", "error:".red().bold(), e);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
