use super::StoreError;
use chrono::{DateTime, SecondsFormat, Utc};
use common::model::place::Place;
use common::requests::ListPlacesQuery;
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde_json::Value as Json;
use std::collections::HashSet;

const COLUMNS: &str = "id, place_id, cid, title, address, category, governorate, latitude, \
     longitude, rating, reviews, position, phone_number, website, opening_hours, price_range, \
     thumbnail_url, place_type, types, rating_count, grid_lat, grid_lng, fid, created_at, updated_at";

/// SQLite's default host-parameter ceiling is far above this; chunking keeps
/// statements small for very large id sets.
const ID_CHUNK: usize = 500;

/// A validated place that is not stored yet.
///
/// Optional fields left as `None` are written as NULL on insert and keep their
/// stored value on an update by `place_id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPlace {
    pub place_id: Option<String>,
    pub cid: Option<String>,
    pub title: String,
    pub address: String,
    pub category: String,
    pub governorate: String,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: f64,
    pub reviews: i64,
    pub position: i64,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub opening_hours: Option<Json>,
    pub price_range: Option<String>,
    pub thumbnail_url: Option<String>,
    pub place_type: Option<String>,
    pub types: Option<Vec<String>>,
    pub rating_count: Option<i64>,
    pub grid_lat: Option<f64>,
    pub grid_lng: Option<f64>,
    pub fid: Option<String>,
}

/// The columns the duplicate scan needs, in store order.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateCandidate {
    pub id: String,
    pub cid: String,
    pub place_id: Option<String>,
    pub title: String,
    pub reviews: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceFilter {
    pub search: Option<String>,
    pub categories: Vec<String>,
    pub governorates: Vec<String>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub min_reviews: Option<i64>,
    pub max_reviews: Option<i64>,
    pub has_phone: bool,
    pub has_website: bool,
}

impl From<&ListPlacesQuery> for PlaceFilter {
    fn from(query: &ListPlacesQuery) -> Self {
        PlaceFilter {
            search: query
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            categories: split_list(query.category.as_deref()),
            governorates: split_list(query.governorate.as_deref()),
            min_rating: query.min_rating,
            max_rating: query.max_rating,
            min_reviews: query.min_reviews,
            max_reviews: query.max_reviews,
            has_phone: query.has_phone.unwrap_or(false),
            has_website: query.has_website.unwrap_or(false),
        }
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

impl PlaceFilter {
    fn where_clause(&self) -> (String, Vec<Value>) {
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(search) = &self.search {
            let pattern = format!("%{}%", escape_like(&search.to_lowercase()));
            clauses.push(
                "(fold_case(title) LIKE ? ESCAPE '\\' OR fold_case(address) LIKE ? ESCAPE '\\')".to_string(),
            );
            values.push(Value::Text(pattern.clone()));
            values.push(Value::Text(pattern));
        }
        if !self.categories.is_empty() {
            clauses.push(format!("category IN ({})", placeholders(self.categories.len())));
            values.extend(self.categories.iter().cloned().map(Value::Text));
        }
        if !self.governorates.is_empty() {
            clauses.push(format!(
                "governorate IN ({})",
                placeholders(self.governorates.len())
            ));
            values.extend(self.governorates.iter().cloned().map(Value::Text));
        }
        if let Some(min) = self.min_rating {
            clauses.push("rating >= ?".to_string());
            values.push(Value::Real(min));
        }
        if let Some(max) = self.max_rating {
            clauses.push("rating <= ?".to_string());
            values.push(Value::Real(max));
        }
        if let Some(min) = self.min_reviews {
            clauses.push("reviews >= ?".to_string());
            values.push(Value::Integer(min));
        }
        if let Some(max) = self.max_reviews {
            clauses.push("reviews <= ?".to_string());
            values.push(Value::Integer(max));
        }
        if self.has_phone {
            clauses.push("trim(coalesce(phone_number, '')) <> ''".to_string());
        }
        if self.has_website {
            clauses.push("trim(coalesce(website, '')) <> ''".to_string());
        }

        if clauses.is_empty() {
            (String::new(), values)
        } else {
            (format!(" WHERE {}", clauses.join(" AND ")), values)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    Rating,
    Reviews,
    Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceSort {
    pub field: SortField,
    pub descending: bool,
}

impl Default for PlaceSort {
    fn default() -> Self {
        PlaceSort {
            field: SortField::Rating,
            descending: true,
        }
    }
}

impl From<&ListPlacesQuery> for PlaceSort {
    /// Unknown fields fall back to rating, unknown directions to descending.
    fn from(query: &ListPlacesQuery) -> Self {
        let field = match query.sort_by.as_deref() {
            Some("title") => SortField::Title,
            Some("reviews") => SortField::Reviews,
            Some("position") => SortField::Position,
            _ => SortField::Rating,
        };
        let descending = !matches!(query.sort_order.as_deref(), Some("asc"));
        PlaceSort { field, descending }
    }
}

impl PlaceSort {
    fn order_by(&self) -> String {
        let column = match self.field {
            SortField::Title => "title COLLATE NOCASE",
            SortField::Rating => "rating",
            SortField::Reviews => "reviews",
            SortField::Position => "position",
        };
        let direction = if self.descending { "DESC" } else { "ASC" };
        format!(" ORDER BY {column} {direction}, created_at ASC, rowid ASC")
    }
}

/// Offset/limit window over a sorted result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: i64,
    pub limit: i64,
}

pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(idx: usize, raw: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_json<T: serde::de::DeserializeOwned>(idx: usize, raw: &str) -> rusqlite::Result<T> {
    serde_json::from_str(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn place_from_row(row: &Row<'_>) -> rusqlite::Result<Place> {
    let opening_hours: Option<String> = row.get(14)?;
    let types: String = row.get(18)?;
    Ok(Place {
        id: row.get(0)?,
        place_id: row.get(1)?,
        cid: row.get(2)?,
        title: row.get(3)?,
        address: row.get(4)?,
        category: row.get(5)?,
        governorate: row.get(6)?,
        latitude: row.get(7)?,
        longitude: row.get(8)?,
        rating: row.get(9)?,
        reviews: row.get(10)?,
        position: row.get(11)?,
        phone_number: row.get(12)?,
        website: row.get(13)?,
        opening_hours: opening_hours
            .as_deref()
            .map(|raw| parse_json(14, raw))
            .transpose()?,
        price_range: row.get(15)?,
        thumbnail_url: row.get(16)?,
        place_type: row.get(17)?,
        types: parse_json(18, &types)?,
        rating_count: row.get(19)?,
        grid_lat: row.get(20)?,
        grid_lng: row.get(21)?,
        fid: row.get(22)?,
        created_at: parse_timestamp(23, row.get(23)?)?,
        updated_at: parse_timestamp(24, row.get(24)?)?,
    })
}

fn json_text(value: &Option<Json>) -> Option<String> {
    value.as_ref().map(Json::to_string)
}

fn types_text(types: &Option<Vec<String>>) -> Option<String> {
    types.as_ref().map(|t| Json::from(t.clone()).to_string())
}

pub fn insert(conn: &Connection, place: &NewPlace, now: DateTime<Utc>) -> Result<Place, StoreError> {
    let id = uuid::Uuid::new_v4().to_string();
    let at = timestamp(now);
    conn.execute(
        &format!(
            "INSERT INTO places ({COLUMNS}) VALUES \
             (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, \
              ?19, ?20, ?21, ?22, ?23, ?24, ?24)"
        ),
        params![
            id,
            place.place_id,
            place.cid,
            place.title,
            place.address,
            place.category,
            place.governorate,
            place.latitude,
            place.longitude,
            place.rating,
            place.reviews,
            place.position,
            place.phone_number,
            place.website,
            json_text(&place.opening_hours),
            place.price_range,
            place.thumbnail_url,
            place.place_type,
            types_text(&place.types).unwrap_or_else(|| "[]".to_string()),
            place.rating_count,
            place.grid_lat,
            place.grid_lng,
            place.fid,
            at,
        ],
    )?;

    get(conn, &id)?.ok_or_else(|| StoreError::NotFound(format!("Place {id} vanished after insert")))
}

pub fn get(conn: &Connection, id: &str) -> Result<Option<Place>, StoreError> {
    let place = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM places WHERE id = ?1"),
            params![id],
            place_from_row,
        )
        .optional()?;
    Ok(place)
}

pub fn exists_by_place_id(conn: &Connection, place_id: &str) -> Result<bool, StoreError> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM places WHERE place_id = ?1",
            params![place_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Returns the subset of `candidates` that already exist as a `place_id`.
pub fn existing_place_ids(
    conn: &Connection,
    candidates: &[String],
) -> Result<HashSet<String>, StoreError> {
    let mut found = HashSet::new();
    for chunk in candidates.chunks(ID_CHUNK) {
        let sql = format!(
            "SELECT place_id FROM places WHERE place_id IN ({})",
            placeholders(chunk.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| row.get::<_, String>(0))?;
        for row in rows {
            found.insert(row?);
        }
    }
    Ok(found)
}

/// Overwrites the required fields and counters of the place with `place_id`.
/// Optional fields only change when `place` carries a value for them.
pub fn update_by_place_id(
    conn: &Connection,
    place_id: &str,
    place: &NewPlace,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    let changed = conn.execute(
        "UPDATE places SET
            cid = COALESCE(?1, cid),
            title = ?2,
            address = ?3,
            category = ?4,
            governorate = ?5,
            latitude = ?6,
            longitude = ?7,
            rating = ?8,
            reviews = ?9,
            position = ?10,
            phone_number = COALESCE(?11, phone_number),
            website = COALESCE(?12, website),
            opening_hours = COALESCE(?13, opening_hours),
            price_range = COALESCE(?14, price_range),
            thumbnail_url = COALESCE(?15, thumbnail_url),
            place_type = COALESCE(?16, place_type),
            types = COALESCE(?17, types),
            rating_count = COALESCE(?18, rating_count),
            grid_lat = COALESCE(?19, grid_lat),
            grid_lng = COALESCE(?20, grid_lng),
            fid = COALESCE(?21, fid),
            updated_at = ?22
         WHERE place_id = ?23",
        params![
            place.cid,
            place.title,
            place.address,
            place.category,
            place.governorate,
            place.latitude,
            place.longitude,
            place.rating,
            place.reviews,
            place.position,
            place.phone_number,
            place.website,
            json_text(&place.opening_hours),
            place.price_range,
            place.thumbnail_url,
            place.place_type,
            types_text(&place.types),
            place.rating_count,
            place.grid_lat,
            place.grid_lng,
            place.fid,
            timestamp(now),
            place_id,
        ],
    )?;

    if changed == 0 {
        return Err(not_found_by_place_id(place_id));
    }
    Ok(())
}

/// Writes every column of an already stored place, keyed by `id`.
pub fn replace(conn: &Connection, place: &Place) -> Result<(), StoreError> {
    let changed = conn.execute(
        "UPDATE places SET
            place_id = ?1, cid = ?2, title = ?3, address = ?4, category = ?5, governorate = ?6,
            latitude = ?7, longitude = ?8, rating = ?9, reviews = ?10, position = ?11,
            phone_number = ?12, website = ?13, opening_hours = ?14, price_range = ?15,
            thumbnail_url = ?16, place_type = ?17, types = ?18, rating_count = ?19,
            grid_lat = ?20, grid_lng = ?21, fid = ?22, updated_at = ?23
         WHERE id = ?24",
        params![
            place.place_id,
            place.cid,
            place.title,
            place.address,
            place.category,
            place.governorate,
            place.latitude,
            place.longitude,
            place.rating,
            place.reviews,
            place.position,
            place.phone_number,
            place.website,
            json_text(&place.opening_hours),
            place.price_range,
            place.thumbnail_url,
            place.place_type,
            Json::from(place.types.clone()).to_string(),
            place.rating_count,
            place.grid_lat,
            place.grid_lng,
            place.fid,
            timestamp(place.updated_at),
            place.id,
        ],
    )?;

    if changed == 0 {
        return Err(StoreError::NotFound(format!("No place found with id '{}'", place.id)));
    }
    Ok(())
}

pub fn delete(conn: &Connection, id: &str) -> Result<bool, StoreError> {
    let removed = conn.execute("DELETE FROM places WHERE id = ?1", params![id])?;
    Ok(removed > 0)
}

pub fn delete_by_place_id(conn: &Connection, place_id: &str) -> Result<(), StoreError> {
    let removed = conn.execute("DELETE FROM places WHERE place_id = ?1", params![place_id])?;
    if removed == 0 {
        return Err(not_found_by_place_id(place_id));
    }
    Ok(())
}

/// Deletes every place whose `id` is in `ids`; unknown ids are ignored.
pub fn delete_many(conn: &Connection, ids: &[String]) -> Result<usize, StoreError> {
    let mut removed = 0;
    for chunk in ids.chunks(ID_CHUNK) {
        let sql = format!("DELETE FROM places WHERE id IN ({})", placeholders(chunk.len()));
        removed += conn.execute(&sql, params_from_iter(chunk.iter()))?;
    }
    Ok(removed)
}

pub fn delete_all(conn: &Connection) -> Result<usize, StoreError> {
    Ok(conn.execute("DELETE FROM places", [])?)
}

pub fn count(conn: &Connection) -> Result<i64, StoreError> {
    Ok(conn.query_row("SELECT COUNT(*) FROM places", [], |row| row.get(0))?)
}

pub fn count_matching(conn: &Connection, filter: &PlaceFilter) -> Result<i64, StoreError> {
    let (clause, values) = filter.where_clause();
    let sql = format!("SELECT COUNT(*) FROM places{clause}");
    Ok(conn.query_row(&sql, params_from_iter(values.iter()), |row| row.get(0))?)
}

pub fn search(
    conn: &Connection,
    filter: &PlaceFilter,
    sort: PlaceSort,
    window: Option<Window>,
) -> Result<Vec<Place>, StoreError> {
    let (clause, mut values) = filter.where_clause();
    let mut sql = format!("SELECT {COLUMNS} FROM places{clause}{}", sort.order_by());
    if let Some(window) = window {
        sql.push_str(" LIMIT ? OFFSET ?");
        values.push(Value::Integer(window.limit));
        values.push(Value::Integer(window.offset));
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), place_from_row)?;
    let mut places = Vec::new();
    for row in rows {
        places.push(row?);
    }
    Ok(places)
}

pub fn all(conn: &Connection) -> Result<Vec<Place>, StoreError> {
    search(conn, &PlaceFilter::default(), PlaceSort::default(), None)
}

/// Every place carrying a `cid`, oldest first. Insertion order breaks ties on
/// equal timestamps, so the first row of a group is always its earliest record.
pub fn duplicate_candidates(conn: &Connection) -> Result<Vec<DuplicateCandidate>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, cid, place_id, title, reviews, created_at FROM places
         WHERE cid IS NOT NULL
         ORDER BY created_at ASC, rowid ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(DuplicateCandidate {
            id: row.get(0)?,
            cid: row.get(1)?,
            place_id: row.get(2)?,
            title: row.get(3)?,
            reviews: row.get(4)?,
            created_at: parse_timestamp(5, row.get(5)?)?,
        })
    })?;

    let mut candidates = Vec::new();
    for row in rows {
        candidates.push(row?);
    }
    Ok(candidates)
}

fn not_found_by_place_id(place_id: &str) -> StoreError {
    StoreError::NotFound(format!("No place found with placeId '{place_id}'"))
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
pub(crate) fn sample(title: &str) -> NewPlace {
    NewPlace {
        title: title.to_string(),
        address: "Avenue Habib Bourguiba".to_string(),
        category: "Café".to_string(),
        governorate: "Tunis".to_string(),
        latitude: 36.8,
        longitude: 10.18,
        ..NewPlace::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn insert_then_get_round_trips_optional_json_fields() {
        let conn = memory();
        let mut new = sample("Café M'rabet");
        new.place_id = Some("p-1".into());
        new.types = Some(vec!["cafe".into(), "bar".into()]);
        new.opening_hours = Some(serde_json::json!({"day0": "08:00-22:00"}));

        let stored = insert(&conn, &new, at(0)).unwrap();
        let fetched = get(&conn, &stored.id).unwrap().unwrap();

        assert_eq!(fetched.types, vec!["cafe", "bar"]);
        assert_eq!(fetched.opening_hours, new.opening_hours);
        assert_eq!(fetched.created_at, at(0));
        assert!(exists_by_place_id(&conn, "p-1").unwrap());
        assert!(!exists_by_place_id(&conn, "p-2").unwrap());
    }

    #[test]
    fn duplicate_place_id_is_a_constraint_error() {
        let conn = memory();
        let mut new = sample("A");
        new.place_id = Some("same".into());
        insert(&conn, &new, at(0)).unwrap();

        let err = insert(&conn, &new, at(1)).unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
        assert!(err.is_row_level());
    }

    #[test]
    fn update_by_place_id_keeps_absent_optionals() {
        let conn = memory();
        let mut new = sample("Before");
        new.place_id = Some("p".into());
        new.website = Some("https://before.tn".into());
        insert(&conn, &new, at(0)).unwrap();

        let mut change = sample("After");
        change.rating = 4.0;
        update_by_place_id(&conn, "p", &change, at(5)).unwrap();

        let stored = &all(&conn).unwrap()[0];
        assert_eq!(stored.title, "After");
        assert_eq!(stored.rating, 4.0);
        assert_eq!(stored.website.as_deref(), Some("https://before.tn"));
        assert_eq!(stored.updated_at, at(5));

        let missing = update_by_place_id(&conn, "nope", &change, at(6)).unwrap_err();
        assert!(matches!(missing, StoreError::NotFound(_)));
    }

    #[test]
    fn delete_many_ignores_unknown_ids() {
        let conn = memory();
        let a = insert(&conn, &sample("A"), at(0)).unwrap();
        let b = insert(&conn, &sample("B"), at(1)).unwrap();

        let removed = delete_many(&conn, &[a.id.clone(), "ghost".into(), b.id.clone()]).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(count(&conn).unwrap(), 0);
    }

    #[test]
    fn filters_and_sorting_apply_together() {
        let conn = memory();
        let mut hotel = sample("Dar Ben Gacem");
        hotel.category = "Hotel".into();
        hotel.rating = 4.8;
        hotel.reviews = 320;
        hotel.phone_number = Some("+216 71 000 000".into());
        insert(&conn, &hotel, at(0)).unwrap();

        let mut cafe = sample("Café de Paris");
        cafe.rating = 3.9;
        cafe.reviews = 40;
        cafe.phone_number = Some("   ".into());
        insert(&conn, &cafe, at(1)).unwrap();

        let mut sousse = sample("Dar Sousse");
        sousse.governorate = "Sousse".into();
        sousse.category = "Hotel".into();
        sousse.rating = 4.1;
        insert(&conn, &sousse, at(2)).unwrap();

        let query = ListPlacesQuery {
            search: Some("DAR".into()),
            category: Some("Hotel,Restaurant".into()),
            sort_by: Some("rating".into()),
            sort_order: Some("asc".into()),
            ..ListPlacesQuery::default()
        };
        let filter = PlaceFilter::from(&query);
        let found = search(&conn, &filter, PlaceSort::from(&query), None).unwrap();
        let titles: Vec<_> = found.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Dar Sousse", "Dar Ben Gacem"]);

        let phones = PlaceFilter {
            has_phone: true,
            ..PlaceFilter::default()
        };
        assert_eq!(count_matching(&conn, &phones).unwrap(), 1);

        let window = search(
            &conn,
            &PlaceFilter::default(),
            PlaceSort::default(),
            Some(Window { offset: 1, limit: 1 }),
        )
        .unwrap();
        assert_eq!(window[0].title, "Dar Sousse");
    }

    #[test]
    fn search_folds_accented_capitals() {
        let conn = memory();
        insert(&conn, &sample("ÉTOILE DU NORD"), at(0)).unwrap();
        let mut other = sample("Café Ünal");
        other.address = "RUE DE L'ÉGLISE".into();
        insert(&conn, &other, at(1)).unwrap();

        let filter = |term: &str| PlaceFilter {
            search: Some(term.into()),
            ..PlaceFilter::default()
        };
        assert_eq!(count_matching(&conn, &filter("étoile")).unwrap(), 1);
        assert_eq!(count_matching(&conn, &filter("Étoile du")).unwrap(), 1);
        assert_eq!(count_matching(&conn, &filter("l'église")).unwrap(), 1);
        assert_eq!(count_matching(&conn, &filter("etoile")).unwrap(), 0);
    }

    #[test]
    fn all_keyword_disables_list_filters() {
        let query = ListPlacesQuery {
            category: Some("all".into()),
            governorate: Some(" Tunis , ".into()),
            ..ListPlacesQuery::default()
        };
        let filter = PlaceFilter::from(&query);
        assert!(filter.categories.is_empty());
        assert_eq!(filter.governorates, vec!["Tunis"]);
    }

    #[test]
    fn duplicate_candidates_are_oldest_first() {
        let conn = memory();
        let mut late = sample("late");
        late.cid = Some("X".into());
        insert(&conn, &late, at(30)).unwrap();
        let mut early = sample("early");
        early.cid = Some("X".into());
        insert(&conn, &early, at(10)).unwrap();
        insert(&conn, &sample("no cid"), at(0)).unwrap();

        let found = duplicate_candidates(&conn).unwrap();
        let titles: Vec<_> = found.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["early", "late"]);
    }
}
