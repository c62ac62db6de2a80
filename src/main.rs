use std::io::{self, Write};

use tracing::info;

use staybook::date::Date;
use staybook::engine::{Engine, SearchFilters};
use staybook::model::Reservation;
use staybook::storage::Storage;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let metrics_port: Option<u16> = std::env::var("STAYBOOK_METRICS_PORT")
        .ok()
        .and_then(|s| s.parse().ok());
    staybook::observability::init(metrics_port);

    let data_dir = std::env::var("STAYBOOK_DATA_DIR").unwrap_or_else(|_| "./data".into());
    std::fs::create_dir_all(&data_dir)?;
    info!("data_dir: {data_dir}");

    let mut engine = Engine::open(Storage::new(data_dir));

    loop {
        println!();
        println!("--- staybook ---");
        println!("1. log in as host");
        println!("2. log in as guest");
        println!("0. quit");
        match prompt("> ")?.as_str() {
            "1" => {
                let id = prompt("host id: ")?;
                let credential = prompt("credential: ")?;
                match engine.login_host(&id, &credential) {
                    Ok(()) => host_menu(&mut engine)?,
                    Err(e) => println!("{e}"),
                }
            }
            "2" => {
                let id = prompt("guest id: ")?;
                let credential = prompt("credential: ")?;
                match engine.login_guest(&id, &credential) {
                    Ok(()) => guest_menu(&mut engine)?,
                    Err(e) => println!("{e}"),
                }
            }
            "0" => break,
            _ => println!("unknown option"),
        }
    }

    engine.flush();
    info!("staybook stopped");
    Ok(())
}

fn host_menu(engine: &mut Engine) -> io::Result<()> {
    loop {
        println!();
        println!("--- host menu ---");
        println!("1. my reservations in a date range");
        println!("2. cancel a reservation");
        println!("3. archive reservations before a cutoff");
        println!("0. log out");
        match prompt("> ")?.as_str() {
            "1" => {
                let Some(from) = prompt_date("from (dd/mm/aaaa): ")? else {
                    continue;
                };
                let Some(to) = prompt_date("to (dd/mm/aaaa): ")? else {
                    continue;
                };
                match engine.reservations_for_host(from, to) {
                    Ok(reservations) => {
                        println!("{} reservation(s)", reservations.len());
                        for r in reservations {
                            print_summary(r);
                        }
                    }
                    Err(e) => println!("{e}"),
                }
            }
            "2" => {
                let code = prompt("reservation code: ")?;
                match engine.cancel_reservation(&code) {
                    Ok(()) => println!("reservation {code} cancelled"),
                    Err(e) => println!("{e}"),
                }
            }
            "3" => {
                let Some(cutoff) = prompt_date("cutoff (dd/mm/aaaa): ")? else {
                    continue;
                };
                match engine.archive_by_cutoff(cutoff) {
                    Ok(report) => println!(
                        "archived {} reservation(s), {} still active",
                        report.archived, report.retained
                    ),
                    Err(e) => println!("{e}"),
                }
            }
            "0" => {
                engine.logout();
                return Ok(());
            }
            _ => println!("unknown option"),
        }
    }
}

fn guest_menu(engine: &mut Engine) -> io::Result<()> {
    loop {
        println!();
        println!("--- guest menu ---");
        println!("1. search available accommodations");
        println!("2. book an accommodation");
        println!("3. cancel a reservation");
        println!("4. my reservations");
        println!("0. log out");
        match prompt("> ")?.as_str() {
            "1" => {
                let Some(check_in) = prompt_date("check-in (dd/mm/aaaa): ")? else {
                    continue;
                };
                let Some(nights) = prompt_nights()? else {
                    continue;
                };
                let municipality = prompt("municipality (optional): ")?;
                let filters = SearchFilters {
                    municipality: (!municipality.is_empty()).then_some(municipality),
                    ..SearchFilters::default()
                };
                let free = engine.list_available(check_in, nights, &filters);
                println!("{} accommodation(s) free", free.len());
                for a in free {
                    println!(
                        "  {} | {} | {} | {} per night",
                        a.code, a.name, a.municipality, a.price_per_night
                    );
                }
            }
            "2" => {
                let code = prompt("accommodation code: ")?;
                let Some(check_in) = prompt_date("check-in (dd/mm/aaaa): ")? else {
                    continue;
                };
                let Some(nights) = prompt_nights()? else {
                    continue;
                };
                let payment_method = prompt("payment method: ")?;
                let notes = prompt("notes: ")?;
                match engine.create_reservation(&code, check_in, nights, &payment_method, &notes) {
                    Ok(code) => {
                        println!("booked!");
                        if let Some(r) = engine.active_reservation(&code) {
                            print_receipt(r);
                        }
                    }
                    Err(e) => println!("{e}"),
                }
            }
            "3" => {
                let code = prompt("reservation code: ")?;
                match engine.cancel_reservation(&code) {
                    Ok(()) => println!("reservation {code} cancelled"),
                    Err(e) => println!("{e}"),
                }
            }
            "4" => match engine.reservations_for_guest() {
                Ok(reservations) => {
                    println!("{} reservation(s)", reservations.len());
                    for r in reservations {
                        print_summary(r);
                    }
                }
                Err(e) => println!("{e}"),
            },
            "0" => {
                engine.logout();
                return Ok(());
            }
            _ => println!("unknown option"),
        }
    }
}

fn print_summary(r: &Reservation) {
    println!(
        "  {} | {} | {} -> {} | {} night(s) | {}",
        r.code,
        r.accommodation_code,
        r.check_in,
        r.check_out(),
        r.nights,
        r.amount_paid
    );
}

fn print_receipt(r: &Reservation) {
    println!("  --- booking receipt ---");
    println!("  code:          {}", r.code);
    println!("  accommodation: {}", r.accommodation_code);
    println!("  guest doc:     {}", r.guest_document);
    println!("  payment:       {}", r.payment_method);
    println!("  check-in:      {}", r.check_in.long_format());
    println!("  check-out:     {}", r.check_out().long_format());
    println!("  total paid:    {}", r.amount_paid);
    println!("  state:         {}", if r.active { "active" } else { "cancelled" });
    if !r.notes.is_empty() {
        println!("  notes:         {}", r.notes);
    }
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf)?;
    Ok(buf.trim().to_string())
}

fn prompt_date(label: &str) -> io::Result<Option<Date>> {
    let raw = prompt(label)?;
    let date = Date::parse(&raw);
    if date.is_none() {
        println!("dates look like 01/06/2025");
    }
    Ok(date)
}

fn prompt_nights() -> io::Result<Option<u32>> {
    let raw = prompt("nights: ")?;
    let nights = raw.parse().ok();
    if nights.is_none() {
        println!("nights must be a whole number");
    }
    Ok(nights)
}
