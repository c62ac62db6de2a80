//! Gateway between the on-disk delimited datasets and the in-memory stores.
//!
//! Listings, hosts, and guests are read at startup and never written back.
//! The active-reservations file is the only dataset that round-trips: it is
//! rewritten from scratch after every successful create/cancel and at
//! shutdown. Deactivated reservations go to a separate append-only history
//! file that is never rewritten.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, warn};

use crate::csv;
use crate::date::Date;
use crate::engine::Store;
use crate::model::{Accommodation, Guest, Host, Reservation};
use crate::observability;

pub const ACCOMMODATIONS_FILE: &str = "Alojamientos.csv";
pub const HOSTS_FILE: &str = "Anfitriones.csv";
pub const GUESTS_FILE: &str = "Huespedes.csv";
pub const ACTIVE_FILE: &str = "Reservaciones.csv";
pub const HISTORY_FILE: &str = "Historico.csv";

const ACCOMMODATION_FIELDS: usize = 9;
const HOST_FIELDS: usize = 6;
const GUEST_FIELDS: usize = 6;
const RESERVATION_FIELDS: usize = 10;

pub const ACTIVE_HEADER: &str = "CodigoReservacion,CodigoAlojamiento,DocumentoHuesped,\
FechaEntrada,DuracionNoches,MetodoPago,FechaPago,MontoPagado,Anotaciones,Activa";

/// Why one row was rejected. Consumed by the loading loop, which skips the
/// row and keeps reading; never crosses the crate boundary.
#[derive(Debug)]
enum RowError {
    FieldCount { expected: usize, found: usize },
    Numeric { field: &'static str },
    Date { field: &'static str },
    Validation { field: &'static str },
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowError::FieldCount { expected, found } => {
                write!(f, "expected {expected} fields, found {found}")
            }
            RowError::Numeric { field } => write!(f, "bad numeric literal in {field}"),
            RowError::Date { field } => write!(f, "malformed date in {field}"),
            RowError::Validation { field } => write!(f, "rejected value in {field}"),
        }
    }
}

/// Everything `load_all` produced, in load order.
pub struct LoadedData {
    pub accommodations: Store<Accommodation>,
    pub hosts: Store<Host>,
    pub guests: Store<Guest>,
    pub reservations: Store<Reservation>,
}

pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Read the four datasets in their fixed order. An unreadable file is
    /// logged and treated as an empty dataset, never as a fatal error.
    pub fn load_all(&self) -> LoadedData {
        let accommodations = self.load_dataset(ACCOMMODATIONS_FILE, parse_accommodation);
        let hosts = self.load_dataset(HOSTS_FILE, parse_host);
        let guests = self.load_dataset(GUESTS_FILE, parse_guest);
        let reservations = self.load_dataset(ACTIVE_FILE, parse_reservation);
        LoadedData {
            accommodations,
            hosts,
            guests,
            reservations,
        }
    }

    /// One dataset: skip the header, parse each row, warn and continue on
    /// rejects. `Ok(None)` marks a row the parser dropped on purpose.
    fn load_dataset<T>(
        &self,
        file: &str,
        parse: impl Fn(&[String]) -> Result<Option<T>, RowError>,
    ) -> Store<T> {
        let path = self.path(file);
        let mut store = Store::new();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("could not read {}: {e}; treating as empty", path.display());
                return store;
            }
        };

        let mut lines = content.lines();
        if lines.next().is_none() {
            warn!("{} has no header row", path.display());
            return store;
        }

        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            let fields = csv::split_row(line);
            match parse(&fields) {
                Ok(Some(item)) => store.append(item),
                Ok(None) => debug!("dropping inactive row in {file}: {line}"),
                Err(e) => {
                    warn!("skipping row in {file}: {e} ({line})");
                    metrics::counter!(observability::ROWS_SKIPPED_TOTAL).increment(1);
                }
            }
        }
        store
    }

    /// Rewrite the active-reservations file from scratch: header plus one row
    /// per entry. A failed rewrite is logged and skipped, leaving the
    /// previous file in place until the next successful save.
    pub fn save_active(&self, active: &Store<Reservation>) {
        let start = Instant::now();
        let path = self.path(ACTIVE_FILE);
        if let Err(e) = write_active(&path, active) {
            warn!("could not rewrite {}: {e}; save skipped", path.display());
            return;
        }
        metrics::histogram!(observability::ACTIVE_SAVE_DURATION_SECONDS)
            .record(start.elapsed().as_secs_f64());
    }

    /// Append one row to the history file. No header, never rewritten.
    pub fn append_history(&self, reservation: &Reservation) {
        let path = self.path(HISTORY_FILE);
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .and_then(|file| {
                let mut writer = BufWriter::new(file);
                writeln!(writer, "{}", csv::format_row(&reservation_fields(reservation)))?;
                writer.flush()
            });
        if let Err(e) = result {
            warn!("could not append to {}: {e}; entry lost", path.display());
        }
    }
}

fn write_active(path: &Path, active: &Store<Reservation>) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{ACTIVE_HEADER}")?;
    for reservation in active.iter() {
        writeln!(writer, "{}", csv::format_row(&reservation_fields(reservation)))?;
    }
    writer.flush()?;
    writer.get_ref().sync_all()
}

fn reservation_fields(r: &Reservation) -> [String; RESERVATION_FIELDS] {
    [
        r.code.clone(),
        r.accommodation_code.clone(),
        r.guest_document.clone(),
        r.check_in.to_string(),
        r.nights.to_string(),
        r.payment_method.clone(),
        r.payment_date.to_string(),
        r.amount_paid.to_string(),
        r.notes.clone(),
        (if r.active { "1" } else { "0" }).to_string(),
    ]
}

fn expect_fields(fields: &[String], expected: usize) -> Result<(), RowError> {
    if fields.len() != expected {
        return Err(RowError::FieldCount {
            expected,
            found: fields.len(),
        });
    }
    Ok(())
}

fn parse_num<N: std::str::FromStr>(
    fields: &[String],
    idx: usize,
    field: &'static str,
) -> Result<N, RowError> {
    fields[idx].parse().map_err(|_| RowError::Numeric { field })
}

fn parse_accommodation(fields: &[String]) -> Result<Option<Accommodation>, RowError> {
    expect_fields(fields, ACCOMMODATION_FIELDS)?;
    let price: f64 = parse_num(fields, 7, "Precio")?;
    Ok(Some(Accommodation::new(
        &fields[0], &fields[1], &fields[2], &fields[3], &fields[4], &fields[5], &fields[6],
        price, &fields[8],
    )))
}

fn parse_host(fields: &[String]) -> Result<Option<Host>, RowError> {
    expect_fields(fields, HOST_FIELDS)?;
    let tenure: u32 = parse_num(fields, 4, "AntiguedadMeses")?;
    let rating: f32 = parse_num(fields, 5, "Puntuacion")?;
    Ok(Some(Host::new(
        &fields[0], &fields[1], &fields[2], &fields[3], tenure, rating,
    )))
}

fn parse_guest(fields: &[String]) -> Result<Option<Guest>, RowError> {
    expect_fields(fields, GUEST_FIELDS)?;
    let tenure: u32 = parse_num(fields, 4, "AntiguedadMeses")?;
    let rating: f32 = parse_num(fields, 5, "Puntuacion")?;
    Ok(Some(Guest::new(
        &fields[0], &fields[1], &fields[2], &fields[3], tenure, rating,
    )))
}

/// Rows flagged inactive are dropped outright: the active store only ever
/// holds live reservations, and history is written elsewhere.
fn parse_reservation(fields: &[String]) -> Result<Option<Reservation>, RowError> {
    expect_fields(fields, RESERVATION_FIELDS)?;
    let active = matches!(fields[9].as_str(), "1" | "true");
    if !active {
        return Ok(None);
    }
    let check_in = Date::parse(&fields[3]).ok_or(RowError::Date {
        field: "FechaEntrada",
    })?;
    let nights: u32 = parse_num(fields, 4, "DuracionNoches")?;
    if nights == 0 {
        return Err(RowError::Validation {
            field: "DuracionNoches",
        });
    }
    let payment_date = Date::parse(&fields[6]).ok_or(RowError::Date { field: "FechaPago" })?;
    let amount: i64 = parse_num(fields, 7, "MontoPagado")?;
    Ok(Some(Reservation::new(
        &fields[0], &fields[1], &fields[2], &fields[5], check_in, nights, payment_date, amount,
        &fields[8],
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("staybook_test_storage").join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_file(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn missing_files_load_as_empty() {
        let storage = Storage::new(test_dir("missing"));
        let data = storage.load_all();
        assert_eq!(data.accommodations.len(), 0);
        assert_eq!(data.hosts.len(), 0);
        assert_eq!(data.guests.len(), 0);
        assert_eq!(data.reservations.len(), 0);
    }

    #[test]
    fn header_only_files_load_as_empty() {
        let dir = test_dir("header_only");
        write_file(&dir, ACTIVE_FILE, &format!("{ACTIVE_HEADER}\n"));
        let storage = Storage::new(dir);
        assert_eq!(storage.load_all().reservations.len(), 0);
    }

    #[test]
    fn quoted_fields_survive_the_load() {
        let dir = test_dir("quoted");
        write_file(
            &dir,
            ACCOMMODATIONS_FILE,
            "CodigoID,Nombre,Direccion,Depto,Mun,Tipo,Amenidades,Precio,AnfitrionID\n\
             AL100,\"Casa, Grande\",\"Calle 1, Apto 2\",Antioquia,Medellin,casa,\"wifi, piscina\",120000,ANF001\n",
        );
        let storage = Storage::new(dir);
        let data = storage.load_all();
        assert_eq!(data.accommodations.len(), 1);
        let a = data.accommodations.iter().next().unwrap();
        assert_eq!(a.name, "Casa, Grande");
        assert_eq!(a.address, "Calle 1, Apto 2");
        assert_eq!(a.amenities, "wifi, piscina");
        assert_eq!(a.price_per_night, 120000.0);
    }

    #[test]
    fn bad_rows_are_skipped_and_loading_continues() {
        let dir = test_dir("bad_rows");
        write_file(
            &dir,
            ACCOMMODATIONS_FILE,
            "CodigoID,Nombre,Direccion,Depto,Mun,Tipo,Amenidades,Precio,AnfitrionID\n\
             AL001,Casa,Calle 1,Antioquia,Medellin,casa,wifi,100000,ANF001\n\
             AL002,Apto,Carrera 2\n\
             AL003,Finca,Via 3,Antioquia,Guatape,finca,lago,caro,ANF001\n\
             AL004,Cabana,Via 4,Antioquia,Jardin,cabana,chimenea,90000,ANF002\n",
        );
        let storage = Storage::new(dir);
        let data = storage.load_all();
        let codes: Vec<&str> = data
            .accommodations
            .iter()
            .map(|a| a.code.as_str())
            .collect();
        assert_eq!(codes, vec!["AL001", "AL004"]);
    }

    #[test]
    fn inactive_reservation_rows_are_dropped() {
        let dir = test_dir("inactive");
        write_file(
            &dir,
            ACTIVE_FILE,
            &format!(
                "{ACTIVE_HEADER}\n\
                 RES001,AL001,1001,01/06/2025,3,tarjeta,01/01/1900,300000,,1\n\
                 RES002,AL001,1002,10/06/2025,2,efectivo,01/01/1900,200000,,0\n\
                 RES003,AL002,1003,12/06/2025,1,tarjeta,01/01/1900,80000,,true\n"
            ),
        );
        let storage = Storage::new(dir);
        let data = storage.load_all();
        let codes: Vec<&str> = data.reservations.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["RES001", "RES003"]);
        assert!(data.reservations.iter().all(|r| r.active));
    }

    #[test]
    fn reservation_rows_with_bad_literals_are_skipped() {
        let dir = test_dir("bad_reservations");
        write_file(
            &dir,
            ACTIVE_FILE,
            &format!(
                "{ACTIVE_HEADER}\n\
                 RES001,AL001,1001,xx/06/2025,3,tarjeta,01/01/1900,300000,,1\n\
                 RES002,AL001,1002,10/06/2025,cero,efectivo,01/01/1900,200000,,1\n\
                 RES003,AL001,1003,10/06/2025,0,efectivo,01/01/1900,0,,1\n\
                 RES004,AL002,1004,12/06/2025,1,tarjeta,01/01/1900,80000,,1\n"
            ),
        );
        let storage = Storage::new(dir);
        let data = storage.load_all();
        let codes: Vec<&str> = data.reservations.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["RES004"]);
    }

    #[test]
    fn save_then_load_round_trips_the_active_set() {
        let dir = test_dir("round_trip");
        let storage = Storage::new(dir);

        let mut active = Store::new();
        active.append(Reservation::new(
            "RES001",
            "AL001",
            "1001",
            "tarjeta",
            Date::new(1, 6, 2025),
            3,
            Date::sentinel(),
            300_000,
            "llego tarde, despues de las 9",
        ));
        active.append(Reservation::new(
            "RES002",
            "AL002",
            "1002",
            "efectivo",
            Date::new(10, 6, 2025),
            2,
            Date::sentinel(),
            160_000,
            "",
        ));
        storage.save_active(&active);

        let reloaded = storage.load_all().reservations;
        assert_eq!(reloaded.len(), 2);
        for (orig, back) in active.iter().zip(reloaded.iter()) {
            assert_eq!(orig, back);
        }
    }

    #[test]
    fn history_appends_accumulate_without_header() {
        let dir = test_dir("history");
        let storage = Storage::new(dir.clone());

        let mut r = Reservation::new(
            "RES001",
            "AL001",
            "1001",
            "tarjeta",
            Date::new(1, 6, 2025),
            3,
            Date::sentinel(),
            300_000,
            "",
        );
        r.deactivate();
        storage.append_history(&r);
        storage.append_history(&r);

        let contents = fs::read_to_string(dir.join(HISTORY_FILE)).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("RES001,AL001,1001,"));
        assert!(lines[0].ends_with(",0"));
    }
}
