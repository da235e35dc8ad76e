//! The built-in Swiss network: the stations of Switzerland, the border
//! stations of its four neighbours, the routes between them and the tickets.

use crate::bag::SortedBag;
use crate::card::Color::{self, *};
use crate::error::RulesResult;
use crate::route::{Level, Route};
use crate::station::Station;
use crate::ticket::{Ticket, Trip};

lazy_static! {
    static ref NETWORK: Network = Network::build().expect("the built-in network is valid");
}

/// Convenience macro to declare the stations of the network. Each code
/// becomes a variant of `Code`, whose ordinal is the station id.
macro_rules! stations {
  ($($code:ident => $name:literal),+ $(,)?) => {
    #[allow(clippy::upper_case_acronyms)]
    #[derive(Clone, Copy, Debug)]
    enum Code { $($code),+ }

    const STATION_NAMES: &[&str] = &[$($name),+];
  };
}

stations! {
    BAD => "Baden",
    BAL => "Bâle",
    BEL => "Bellinzone",
    BER => "Berne",
    BRI => "Brigue",
    BRU => "Brusio",
    COI => "Coire",
    DAV => "Davos",
    DEL => "Delémont",
    FRI => "Fribourg",
    GEN => "Genève",
    INT => "Interlaken",
    KRE => "Kreuzlingen",
    LAU => "Lausanne",
    LCF => "La Chaux-de-Fonds",
    LOC => "Locarno",
    LUC => "Lucerne",
    LUG => "Lugano",
    MAR => "Martigny",
    NEU => "Neuchâtel",
    OLT => "Olten",
    PFA => "Pfäffikon",
    SAR => "Sargans",
    SCE => "Schaffhouse",
    SCZ => "Schwyz",
    SIO => "Sion",
    SOL => "Soleure",
    STG => "Saint-Gall",
    VAD => "Vaduz",
    WAS => "Wassen",
    WIN => "Winterthour",
    YVE => "Yverdon",
    ZOU => "Zoug",
    ZUR => "Zürich",
    DE1 => "Allemagne",
    DE2 => "Allemagne",
    DE3 => "Allemagne",
    DE4 => "Allemagne",
    DE5 => "Allemagne",
    AT1 => "Autriche",
    AT2 => "Autriche",
    AT3 => "Autriche",
    IT1 => "Italie",
    IT2 => "Italie",
    IT3 => "Italie",
    IT4 => "Italie",
    IT5 => "Italie",
    FR1 => "France",
    FR2 => "France",
    FR3 => "France",
    FR4 => "France",
}

use Code::*;
use Level::{Overground as O, Underground as U};

const GERMANY: [Code; 5] = [DE1, DE2, DE3, DE4, DE5];
const AUSTRIA: [Code; 3] = [AT1, AT2, AT3];
const ITALY: [Code; 5] = [IT1, IT2, IT3, IT4, IT5];
const FRANCE: [Code; 4] = [FR1, FR2, FR3, FR4];

// (id, station 1, station 2, length, level, color). `None` is a neutral route.
type RouteDefinition = (&'static str, Code, Code, u8, Level, Option<Color>);

const ROUTES: &[RouteDefinition] = &[
    ("AT1_STG_1", AT1, STG, 4, U, None),
    ("AT2_VAD_1", AT2, VAD, 1, U, Some(Red)),
    ("BAD_BAL_1", BAD, BAL, 3, U, Some(Red)),
    ("BAD_OLT_1", BAD, OLT, 2, O, Some(Violet)),
    ("BAD_ZUR_1", BAD, ZUR, 1, O, Some(Yellow)),
    ("BAL_DE1_1", BAL, DE1, 1, U, Some(Blue)),
    ("BAL_DEL_1", BAL, DEL, 2, U, Some(Yellow)),
    ("BAL_OLT_1", BAL, OLT, 2, U, Some(Orange)),
    ("BEL_LOC_1", BEL, LOC, 1, U, Some(Black)),
    ("BEL_LUG_1", BEL, LUG, 1, U, Some(Red)),
    ("BEL_LUG_2", BEL, LUG, 1, U, Some(Yellow)),
    ("BEL_WAS_1", BEL, WAS, 4, U, None),
    ("BEL_WAS_2", BEL, WAS, 4, U, None),
    ("BER_FRI_1", BER, FRI, 1, O, Some(Orange)),
    ("BER_FRI_2", BER, FRI, 1, O, Some(Yellow)),
    ("BER_INT_1", BER, INT, 3, O, Some(Blue)),
    ("BER_LUC_1", BER, LUC, 4, O, None),
    ("BER_LUC_2", BER, LUC, 4, O, None),
    ("BER_NEU_1", BER, NEU, 2, O, Some(Red)),
    ("BER_SOL_1", BER, SOL, 2, O, Some(Black)),
    ("BRI_INT_1", BRI, INT, 2, U, Some(White)),
    ("BRI_IT5_1", BRI, IT5, 3, U, Some(Green)),
    ("BRI_LOC_1", BRI, LOC, 6, U, None),
    ("BRI_SIO_1", BRI, SIO, 3, U, Some(Black)),
    ("BRI_WAS_1", BRI, WAS, 4, U, Some(Red)),
    ("BRU_COI_1", BRU, COI, 5, U, None),
    ("BRU_DAV_1", BRU, DAV, 4, U, Some(Blue)),
    ("BRU_IT2_1", BRU, IT2, 2, U, Some(Green)),
    ("COI_DAV_1", COI, DAV, 2, U, Some(Violet)),
    ("COI_SAR_1", COI, SAR, 1, U, Some(White)),
    ("COI_WAS_1", COI, WAS, 5, U, None),
    ("DAV_AT3_1", DAV, AT3, 3, U, None),
    ("DAV_IT1_1", DAV, IT1, 3, U, None),
    ("DAV_SAR_1", DAV, SAR, 3, U, Some(Black)),
    ("DE2_SCE_1", DE2, SCE, 1, O, Some(Yellow)),
    ("DE3_KRE_1", DE3, KRE, 1, O, Some(Orange)),
    ("DE4_KRE_1", DE4, KRE, 1, O, Some(White)),
    ("DE5_STG_1", DE5, STG, 2, O, None),
    ("DEL_FR4_1", DEL, FR4, 2, O, Some(Black)),
    ("DEL_LCF_1", DEL, LCF, 3, U, Some(White)),
    ("DEL_SOL_1", DEL, SOL, 1, U, Some(Violet)),
    ("FR1_MAR_1", FR1, MAR, 2, U, None),
    ("FR2_GEN_1", FR2, GEN, 1, O, Some(Yellow)),
    ("FR3_LCF_1", FR3, LCF, 2, U, Some(Green)),
    ("FRI_LAU_1", FRI, LAU, 3, O, Some(Red)),
    ("FRI_LAU_2", FRI, LAU, 3, O, Some(Violet)),
    ("GEN_LAU_1", GEN, LAU, 4, O, Some(Blue)),
    ("GEN_LAU_2", GEN, LAU, 4, O, Some(White)),
    ("GEN_YVE_1", GEN, YVE, 6, O, None),
    ("INT_LUC_1", INT, LUC, 4, O, Some(Violet)),
    ("IT3_LUG_1", IT3, LUG, 2, U, Some(White)),
    ("IT4_LOC_1", IT4, LOC, 2, U, Some(Orange)),
    ("KRE_SCE_1", KRE, SCE, 3, U, Some(Violet)),
    ("KRE_STG_1", KRE, STG, 1, O, Some(Green)),
    ("KRE_WIN_1", KRE, WIN, 2, O, Some(White)),
    ("LAU_MAR_1", LAU, MAR, 4, U, Some(Orange)),
    ("LAU_NEU_1", LAU, NEU, 4, O, None),
    ("LCF_NEU_1", LCF, NEU, 1, U, Some(Orange)),
    ("LCF_YVE_1", LCF, YVE, 3, U, Some(Yellow)),
    ("LOC_LUG_1", LOC, LUG, 1, U, Some(Violet)),
    ("LUC_OLT_1", LUC, OLT, 3, O, Some(Green)),
    ("LUC_SCZ_1", LUC, SCZ, 1, O, Some(Blue)),
    ("LUC_ZOU_1", LUC, ZOU, 1, O, Some(Orange)),
    ("LUC_ZOU_2", LUC, ZOU, 1, O, Some(Yellow)),
    ("MAR_SIO_1", MAR, SIO, 2, U, Some(Green)),
    ("NEU_SOL_1", NEU, SOL, 4, O, Some(Green)),
    ("NEU_YVE_1", NEU, YVE, 2, O, Some(Black)),
    ("OLT_SOL_1", OLT, SOL, 1, O, Some(Blue)),
    ("OLT_ZUR_1", OLT, ZUR, 3, O, Some(White)),
    ("PFA_SAR_1", PFA, SAR, 3, O, Some(Yellow)),
    ("PFA_ZUR_1", PFA, ZUR, 2, O, Some(Blue)),
    ("SAR_VAD_1", SAR, VAD, 1, U, Some(Orange)),
    ("SCE_WIN_1", SCE, WIN, 1, O, Some(Black)),
    ("SCE_ZUR_1", SCE, ZUR, 3, O, Some(Orange)),
    ("SCZ_WAS_1", SCZ, WAS, 2, U, Some(Green)),
    ("SCZ_WAS_2", SCZ, WAS, 2, U, Some(Yellow)),
    ("SCZ_ZOU_1", SCZ, ZOU, 1, O, Some(Black)),
    ("SCZ_ZOU_2", SCZ, ZOU, 1, O, Some(White)),
    ("STG_VAD_1", STG, VAD, 2, U, Some(Blue)),
    ("STG_WIN_1", STG, WIN, 3, O, Some(Red)),
    ("STG_ZUR_1", STG, ZUR, 4, O, Some(Orange)),
    ("WIN_ZUR_1", WIN, ZUR, 1, O, Some(Blue)),
    ("WIN_ZUR_2", WIN, ZUR, 1, O, Some(Violet)),
    ("ZOU_ZUR_1", ZOU, ZUR, 1, O, Some(Green)),
    ("ZOU_ZUR_2", ZOU, ZUR, 1, O, Some(Red)),
];

const CITY_TICKETS: &[(Code, Code, u32)] = &[
    (BAL, BER, 5),
    (BAL, BRI, 10),
    (BAL, STG, 8),
    (BER, COI, 10),
    (BER, LUG, 12),
    (BER, SCZ, 5),
    (BER, ZUR, 6),
    (FRI, LUC, 5),
    (GEN, BAL, 13),
    (GEN, BER, 8),
    (GEN, SIO, 10),
    (GEN, ZUR, 14),
    (INT, WIN, 7),
    (KRE, ZUR, 3),
    (LAU, INT, 7),
    (LAU, LUC, 8),
    (LAU, STG, 13),
    (LCF, BER, 3),
    (LCF, LUC, 7),
    (LCF, ZUR, 8),
    (LUC, VAD, 6),
    (LUC, ZUR, 2),
    (LUG, COI, 10),
    (LUG, LUC, 7),
    (MAR, SCE, 15),
    (NEU, WIN, 9),
    (OLT, SCE, 5),
    (SCE, ZOU, 3),
    (SIO, DAV, 11),
    (SOL, SCZ, 5),
    (STG, BRU, 9),
    (YVE, WAS, 10),
    (ZUR, BRU, 9),
    (ZUR, LUG, 9),
];

/// Everything the network is made of, built once.
struct Network {
    stations: Vec<Station>,
    routes: Vec<Route>,
    tickets: SortedBag<Ticket>,
}

fn station(code: Code) -> Station {
    let id = code as usize;
    Station::new(id, STATION_NAMES[id])
}

fn country(codes: &[Code]) -> Vec<Station> {
    codes.iter().copied().map(station).collect()
}

/// A ticket from `origin` to every one of `destinations`.
fn country_ticket(origin: &[Station], destinations: &[(Vec<Station>, u32)]) -> RulesResult<Ticket> {
    let mut trips = Vec::new();
    for (stations, points) in destinations {
        trips.extend(Trip::all(origin, stations, *points)?);
    }

    Ticket::new(trips)
}

impl Network {
    fn build() -> RulesResult<Self> {
        let stations: Vec<Station> = (0..STATION_NAMES.len())
            .map(|id| Station::new(id, STATION_NAMES[id]))
            .collect();

        let routes = ROUTES
            .iter()
            .map(|&(id, s1, s2, length, level, color)| {
                Route::new(id, station(s1), station(s2), length, level, color)
            })
            .collect::<RulesResult<Vec<_>>>()?;

        let mut tickets = CITY_TICKETS
            .iter()
            .map(|&(from, to, points)| Ticket::single(station(from), station(to), points))
            .collect::<RulesResult<Vec<_>>>()?;

        let (de, at, it, fr) = (country(&GERMANY), country(&AUSTRIA), country(&ITALY), country(&FRANCE));
        tickets.push(country_ticket(
            &[station(BER)],
            &[(de.clone(), 6), (at.clone(), 11), (it.clone(), 8), (fr.clone(), 5)],
        )?);
        tickets.push(country_ticket(
            &[station(ZUR)],
            &[(de.clone(), 3), (at.clone(), 7), (it.clone(), 11), (fr.clone(), 10)],
        )?);
        tickets.push(country_ticket(&de, &[(at.clone(), 5), (it.clone(), 13), (fr.clone(), 5)])?);
        tickets.push(country_ticket(&at, &[(de.clone(), 5), (it.clone(), 14), (fr.clone(), 11)])?);
        tickets.push(country_ticket(&it, &[(de.clone(), 13), (at.clone(), 14), (fr.clone(), 8)])?);
        tickets.push(country_ticket(&fr, &[(de, 5), (at, 11), (it, 8)])?);

        Ok(Self {
            stations,
            routes,
            tickets: tickets.into_iter().collect(),
        })
    }
}

/// Every station, indexed by id.
pub fn stations() -> &'static [Station] {
    &NETWORK.stations
}

pub fn routes() -> &'static [Route] {
    &NETWORK.routes
}

pub fn tickets() -> &'static SortedBag<Ticket> {
    &NETWORK.tickets
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn stations_are_indexed_by_id() {
        assert_eq!(stations().len(), 51);
        for (index, station) in stations().iter().enumerate() {
            assert_eq!(station.id(), index);
        }
        assert_eq!(stations()[BER as usize].name(), "Berne");
        assert_eq!(stations()[FR4 as usize].name(), "France");
    }

    #[test]
    fn routes_are_unique_and_reach_every_station() {
        let ids: HashSet<&str> = routes().iter().map(Route::id).collect();
        assert_eq!(ids.len(), routes().len());

        let reached: HashSet<usize> = routes()
            .iter()
            .flat_map(|route| route.stations())
            .map(Station::id)
            .collect();
        assert_eq!(reached.len(), stations().len());
    }

    #[test]
    fn double_routes_are_parallel() {
        let route = |id: &str| routes().iter().find(|route| route.id() == id).unwrap();
        let (first, second) = (route("BER_FRI_1"), route("BER_FRI_2"));

        assert_eq!(first.to_string(), "Berne - Fribourg");
        assert!(first.is_parallel_to(second));
        assert_ne!(first.color(), second.color());
        assert!(!first.is_parallel_to(route("BER_LUC_1")));
    }

    #[test]
    fn tickets() {
        let tickets = super::tickets();
        assert_eq!(tickets.len(), CITY_TICKETS.len() + 6);

        let texts: Vec<&str> = tickets.iter().map(Ticket::text).collect();
        assert!(texts.contains(&"Bâle - Berne (5)"));
        assert!(texts.contains(&"Berne - {Allemagne (6), Autriche (11), France (5), Italie (8)}"));
        assert!(texts.contains(&"France - {Allemagne (5), Autriche (11), Italie (8)}"));
    }
}
