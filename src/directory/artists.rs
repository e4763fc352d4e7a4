use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set, TransactionTrait,
};

use super::{
    name_contains, with_upcoming_count, ArtistDetail, ArtistFields, ArtistListing, DirectoryStore,
    EntityKind, EntitySummary, SearchResults, StoreError, StoreResult, VenueBooking,
};
use crate::db::entities::{artist, show, venue};

fn artist_err(err: DbErr) -> StoreError {
    StoreError::from_db(err, EntityKind::Artist)
}

fn write_fields(active: &mut artist::ActiveModel, fields: ArtistFields) {
    active.name = Set(fields.name);
    active.city = Set(fields.city);
    active.state = Set(fields.state);
    active.phone = Set(fields.phone);
    active.website_link = Set(fields.website_link);
    active.image_link = Set(fields.image_link);
    active.facebook_link = Set(fields.facebook_link);
    active.genres = Set(fields.genres);
    active.seeking_venue = Set(fields.seeking_venue);
    active.seeking_description = Set(fields.seeking_description);
}

impl DirectoryStore {
    pub async fn list_artists(&self) -> StoreResult<Vec<ArtistListing>> {
        let rows: Vec<(i32, String)> = artist::Entity::find()
            .select_only()
            .column(artist::Column::Id)
            .column(artist::Column::Name)
            .order_by_asc(artist::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(artist_err)?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| ArtistListing { id, name })
            .collect())
    }

    pub async fn search_artists(&self, term: &str) -> StoreResult<SearchResults> {
        let now = self.now();

        let matches: Vec<(i32, String, i64)> = with_upcoming_count(
            artist::Entity::find()
                .select_only()
                .column(artist::Column::Id)
                .column(artist::Column::Name)
                .filter(name_contains(artist::Column::Name, term)),
            artist::Relation::Shows.def(),
            now,
        )
        .group_by(artist::Column::Id)
        .group_by(artist::Column::Name)
        .order_by_asc(artist::Column::Id)
        .into_tuple()
        .all(&self.db)
        .await
        .map_err(artist_err)?;

        tracing::debug!(term, matches = matches.len(), "Artist search");

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

    pub async fn get_artist(&self, artist_id: i32) -> StoreResult<artist::Model> {
        artist::Entity::find_by_id(artist_id)
            .one(&self.db)
            .await
            .map_err(artist_err)?
            .ok_or(StoreError::NotFound {
                entity: EntityKind::Artist,
                id: artist_id,
            })
    }

    pub async fn get_artist_detail(&self, artist_id: i32) -> StoreResult<ArtistDetail> {
        let now = self.now();
        let artist = self.get_artist(artist_id).await?;

        let rows = show::Entity::find()
            .filter(show::Column::ArtistId.eq(artist_id))
            .filter(
                Condition::any()
                    .add(show::Column::StartTime.lt(now))
                    .add(show::Column::StartTime.gt(now)),
            )
            .order_by_asc(show::Column::StartTime)
            .order_by_asc(show::Column::Id)
            .find_also_related(venue::Entity)
            .all(&self.db)
            .await
            .map_err(artist_err)?;

        let (past_shows, upcoming_shows): (Vec<VenueBooking>, Vec<VenueBooking>) = rows
            .into_iter()
            .filter_map(|(show, venue)| {
                venue.map(|venue| VenueBooking {
                    show_id: show.id,
                    venue_id: venue.id,
                    venue_name: venue.name,
                    venue_image_link: venue.image_link,
                    start_time: show.start_time,
                })
            })
            .filter(|booking| booking.start_time != now)
            .partition(|booking| booking.start_time < now);

        Ok(ArtistDetail {
            artist,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        })
    }

    pub async fn create_artist(&self, fields: ArtistFields) -> StoreResult<artist::Model> {
        let name = fields.name.clone();

        let created = self
            .db
            .transaction::<_, artist::Model, StoreError>(|txn| {
                Box::pin(async move {
                    let mut active = <artist::ActiveModel as std::default::Default>::default();
                    write_fields(&mut active, fields);
                    active.insert(txn).await.map_err(artist_err)
                })
            })
            .await
            .map_err(|e| StoreError::from_txn(e, EntityKind::Artist))
            .inspect_err(|e| tracing::warn!("Artist {} could not be listed: {}", name, e))?;

        tracing::info!(artist_id = created.id, "Artist {} was successfully listed", created.name);
        Ok(created)
    }

    pub async fn update_artist(
        &self,
        artist_id: i32,
        fields: ArtistFields,
    ) -> StoreResult<artist::Model> {
        let updated = self
            .db
            .transaction::<_, artist::Model, StoreError>(|txn| {
                Box::pin(async move {
                    let existing = artist::Entity::find_by_id(artist_id)
                        .one(txn)
                        .await
                        .map_err(artist_err)?
                        .ok_or(StoreError::NotFound {
                            entity: EntityKind::Artist,
                            id: artist_id,
                        })?;

                    let mut active: artist::ActiveModel = existing.into();
                    write_fields(&mut active, fields);
                    active.update(txn).await.map_err(artist_err)
                })
            })
            .await
            .map_err(|e| StoreError::from_txn(e, EntityKind::Artist))
            .inspect_err(|e| tracing::warn!(artist_id, "Artist update failed: {}", e))?;

        tracing::info!(artist_id, "Artist {} was successfully updated", updated.name);
        Ok(updated)
    }
}
