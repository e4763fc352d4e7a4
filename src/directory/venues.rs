use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};

use super::{
    name_contains, with_upcoming_count, ArtistBooking, CityGroup, DirectoryStore, EntityKind,
    EntitySummary, SearchResults, StoreError, StoreResult, VenueDetail, VenueFields,
};
use crate::db::entities::{artist, show, venue};

fn venue_err(err: DbErr) -> StoreError {
    StoreError::from_db(err, EntityKind::Venue)
}

fn write_fields(active: &mut venue::ActiveModel, fields: VenueFields) {
    active.name = Set(fields.name);
    active.city = Set(fields.city);
    active.state = Set(fields.state);
    active.address = Set(fields.address);
    active.phone = Set(fields.phone);
    active.website_link = Set(fields.website_link);
    active.image_link = Set(fields.image_link);
    active.facebook_link = Set(fields.facebook_link);
    active.genres = Set(fields.genres);
    active.seeking_talent = Set(fields.seeking_talent);
    active.seeking_description = Set(fields.seeking_description);
}

impl DirectoryStore {
    /// All venues grouped by city, cities in first-seen order over ascending
    /// venue id.
    pub async fn list_venues_grouped_by_city(&self) -> StoreResult<Vec<CityGroup>> {
        let now = self.now();

        let rows: Vec<(i32, String, String, String, i64)> = with_upcoming_count(
            venue::Entity::find()
                .select_only()
                .column(venue::Column::Id)
                .column(venue::Column::Name)
                .column(venue::Column::City)
                .column(venue::Column::State),
            venue::Relation::Shows.def(),
            now,
        )
        .group_by(venue::Column::Id)
        .group_by(venue::Column::Name)
        .group_by(venue::Column::City)
        .group_by(venue::Column::State)
        .order_by_asc(venue::Column::Id)
        .into_tuple()
        .all(&self.db)
        .await
        .map_err(venue_err)?;

        let mut groups: Vec<CityGroup> = Vec::new();
        let mut by_city: HashMap<String, usize> = HashMap::new();

        for (id, name, city, state, num_upcoming_shows) in rows {
            let summary = EntitySummary {
                id,
                name,
                num_upcoming_shows,
            };

            match by_city.get(&city) {
                Some(&idx) => groups[idx].venues.push(summary),
                None => {
                    by_city.insert(city.clone(), groups.len());
                    groups.push(CityGroup {
                        city,
                        state,
                        venues: vec![summary],
                    });
                }
            }
        }

        Ok(groups)
    }

    pub async fn search_venues(&self, term: &str) -> StoreResult<SearchResults> {
        let now = self.now();

        let matches: Vec<(i32, String, i64)> = with_upcoming_count(
            venue::Entity::find()
                .select_only()
                .column(venue::Column::Id)
                .column(venue::Column::Name)
                .filter(name_contains(venue::Column::Name, term)),
            venue::Relation::Shows.def(),
            now,
        )
        .group_by(venue::Column::Id)
        .group_by(venue::Column::Name)
        .order_by_asc(venue::Column::Id)
        .into_tuple()
        .all(&self.db)
        .await
        .map_err(venue_err)?;

        tracing::debug!(term, matches = matches.len(), "Venue search");

        Ok(matches
            .into_iter()
            .map(|(id, name, num_upcoming_shows)| EntitySummary {
                id,
                name,
                num_upcoming_shows,
            })
            .collect::<Vec<_>>()
            .into())
    }

    /// The bare venue row, e.g. to prefill an edit form.
    pub async fn get_venue(&self, venue_id: i32) -> StoreResult<venue::Model> {
        venue::Entity::find_by_id(venue_id)
            .one(&self.db)
            .await
            .map_err(venue_err)?
            .ok_or(StoreError::NotFound {
                entity: EntityKind::Venue,
                id: venue_id,
            })
    }

    /// Venue attributes plus its shows split around the current instant.
    ///
    /// A show starting exactly now is in neither list.
    pub async fn get_venue_detail(&self, venue_id: i32) -> StoreResult<VenueDetail> {
        let now = self.now();
        let venue = self.get_venue(venue_id).await?;

        let rows = show::Entity::find()
            .filter(show::Column::VenueId.eq(venue_id))
            .filter(
                Condition::any()
                    .add(show::Column::StartTime.lt(now))
                    .add(show::Column::StartTime.gt(now)),
            )
            .order_by_asc(show::Column::StartTime)
            .order_by_asc(show::Column::Id)
            .find_also_related(artist::Entity)
            .all(&self.db)
            .await
            .map_err(venue_err)?;

        let mut past_shows = Vec::new();
        let mut upcoming_shows = Vec::new();

        for (show, artist) in rows {
            let Some(artist) = artist else { continue };
            let booking = ArtistBooking {
                show_id: show.id,
                artist_id: artist.id,
                artist_name: artist.name,
                artist_image_link: artist.image_link,
                start_time: show.start_time,
            };
            if show.start_time < now {
                past_shows.push(booking);
            } else if show.start_time > now {
                upcoming_shows.push(booking);
            }
        }

        Ok(VenueDetail {
            venue,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        })
    }

    pub async fn create_venue(&self, fields: VenueFields) -> StoreResult<venue::Model> {
        let name = fields.name.clone();

        let created = self
            .db
            .transaction::<_, venue::Model, StoreError>(|txn| {
                Box::pin(async move {
                    let mut active = <venue::ActiveModel as std::default::Default>::default();
                    write_fields(&mut active, fields);
                    active.insert(txn).await.map_err(venue_err)
                })
            })
            .await
            .map_err(|e| StoreError::from_txn(e, EntityKind::Venue))
            .inspect_err(|e| tracing::warn!("Venue {} could not be listed: {}", name, e))?;

        tracing::info!(venue_id = created.id, "Venue {} was successfully listed", created.name);
        Ok(created)
    }

    /// Overwrite every mutable attribute of an existing venue.
    pub async fn update_venue(&self, venue_id: i32, fields: VenueFields) -> StoreResult<venue::Model> {
        let updated = self
            .db
            .transaction::<_, venue::Model, StoreError>(|txn| {
                Box::pin(async move {
                    let existing = venue::Entity::find_by_id(venue_id)
                        .one(txn)
                        .await
                        .map_err(venue_err)?
                        .ok_or(StoreError::NotFound {
                            entity: EntityKind::Venue,
                            id: venue_id,
                        })?;

                    let mut active: venue::ActiveModel = existing.into();
                    write_fields(&mut active, fields);
                    active.update(txn).await.map_err(venue_err)
                })
            })
            .await
            .map_err(|e| StoreError::from_txn(e, EntityKind::Venue))
            .inspect_err(|e| tracing::warn!(venue_id, "Venue update failed: {}", e))?;

        tracing::info!(venue_id, "Venue {} was successfully updated", updated.name);
        Ok(updated)
    }

    /// Delete a venue that no show references.
    ///
    /// Venues with scheduled shows (past or upcoming) are rejected with
    /// `ConstraintViolation` and left untouched.
    pub async fn delete_venue(&self, venue_id: i32) -> StoreResult<()> {
        self.db
            .transaction::<_, (), StoreError>(|txn| {
                Box::pin(async move {
                    let exists = venue::Entity::find_by_id(venue_id)
                        .one(txn)
                        .await
                        .map_err(venue_err)?
                        .is_some();
                    if !exists {
                        return Err(StoreError::NotFound {
                            entity: EntityKind::Venue,
                            id: venue_id,
                        });
                    }

                    let dependents = show::Entity::find()
                        .filter(show::Column::VenueId.eq(venue_id))
                        .count(txn)
                        .await
                        .map_err(venue_err)?;
                    if dependents > 0 {
                        return Err(StoreError::ConstraintViolation {
                            entity: EntityKind::Venue,
                            message: format!(
                                "venue {venue_id} still has {dependents} scheduled show(s)"
                            ),
                        });
                    }

                    venue::Entity::delete_by_id(venue_id)
                        .exec(txn)
                        .await
                        .map_err(venue_err)?;
                    Ok(())
                })
            })
            .await
            .map_err(|e| StoreError::from_txn(e, EntityKind::Venue))
            .inspect_err(|e| tracing::warn!(venue_id, "Venue delete failed: {}", e))?;

        tracing::info!(venue_id, "Venue deleted");
        Ok(())
    }
}
