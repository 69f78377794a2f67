use redb::{Database as RedbDatabase, ReadableTable, TableDefinition};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    CreateListingRequest, Listing, ListingFilter, ListingQuery, SortField, SortOrder,
    UpdateListingRequest, User,
};

// Table definitions
const LISTINGS: TableDefinition<&str, &[u8]> = TableDefinition::new("listings");
const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

pub struct Database {
    db: RedbDatabase,
}

impl Database {
    pub fn open(path: &str) -> Result<Self> {
        let db = RedbDatabase::create(path)?;

        // Initialize tables
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(LISTINGS)?;
            let _ = write_txn.open_table(USERS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    // === Listing operations ===

    pub fn create_listing(&self, req: CreateListingRequest) -> Result<Listing> {
        let listing = Listing {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            description: req.description,
            address: req.address,
            kind: req.kind,
            furnished: req.furnished,
            parking: req.parking,
            offer: req.offer,
            bedrooms: req.bedrooms,
            bathrooms: req.bathrooms,
            regular_price: req.regular_price,
            discount_price: req.discount_price,
            image_urls: req.image_urls,
            user_ref: req.user_ref,
            created_at: now_millis(),
        };
        let json = serde_json::to_vec(&listing)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(LISTINGS)?;
            table.insert(listing.id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;

        Ok(listing)
    }

    pub fn get_listing(&self, id: &str) -> Result<Option<Listing>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(LISTINGS)?;

        match table.get(id)? {
            Some(raw) => Ok(Some(serde_json::from_slice(raw.value())?)),
            None => Ok(None),
        }
    }

    /// Applies the provided fields to the stored listing. Returns `None` if
    /// no listing exists under `id`.
    pub fn update_listing(
        &self,
        id: &str,
        update: &UpdateListingRequest,
    ) -> Result<Option<Listing>> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut table = write_txn.open_table(LISTINGS)?;

            let current = match table.get(id)? {
                Some(raw) => Some(serde_json::from_slice::<Listing>(raw.value())?),
                None => None,
            };

            match current {
                Some(mut listing) => {
                    update.apply(&mut listing);
                    let json = serde_json::to_vec(&listing)?;
                    table.insert(id, json.as_slice())?;
                    Some(listing)
                }
                None => None,
            }
        };
        write_txn.commit()?;

        Ok(updated)
    }

    pub fn delete_listing(&self, id: &str) -> Result<bool> {
        let write_txn = self.db.begin_write()?;
        let existed = {
            let mut table = write_txn.open_table(LISTINGS)?;
            let existed = table.remove(id)?.is_some();
            existed
        };
        write_txn.commit()?;

        Ok(existed)
    }

    /// Returns every listing the filter accepts, in table scan order
    /// (listing-id order).
    pub fn find_listings(&self, filter: &ListingFilter) -> Result<Vec<Listing>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(LISTINGS)?;

        let mut listings = Vec::new();
        for row in table.iter()? {
            let (_, raw) = row?;
            let listing: Listing = serde_json::from_slice(raw.value())?;
            if filter.matches(&listing) {
                listings.push(listing);
            }
        }
        Ok(listings)
    }

    /// Filtering, then sorting, then pagination.
    pub fn search_listings(&self, query: &ListingQuery) -> Result<Vec<Listing>> {
        let mut listings = self.find_listings(&query.filter)?;
        sort_listings(&mut listings, query.sort, query.order);

        Ok(listings
            .into_iter()
            .skip(query.start_index)
            .take(query.limit)
            .collect())
    }

    // === User operations ===

    pub fn create_user(&self, username: &str, email: &str) -> Result<User> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            favourites: Vec::new(),
        };
        let json = serde_json::to_vec(&user)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(USERS)?;
            table.insert(user.id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;

        Ok(user)
    }

    pub fn get_user(&self, id: &str) -> Result<Option<User>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;

        match table.get(id)? {
            Some(raw) => Ok(Some(serde_json::from_slice(raw.value())?)),
            None => Ok(None),
        }
    }

    // === Favourites operations ===

    /// Never duplicates an id already in the set. Returns `None` for an
    /// unknown user.
    pub fn add_favourite(&self, user_id: &str, listing_id: &str) -> Result<Option<User>> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut table = write_txn.open_table(USERS)?;

            let current = match table.get(user_id)? {
                Some(raw) => Some(serde_json::from_slice::<User>(raw.value())?),
                None => None,
            };

            match current {
                Some(mut user) => {
                    if !user.favourites.iter().any(|id| id == listing_id) {
                        user.favourites.push(listing_id.to_string());
                    }
                    let json = serde_json::to_vec(&user)?;
                    table.insert(user_id, json.as_slice())?;
                    Some(user)
                }
                None => None,
            }
        };
        write_txn.commit()?;

        Ok(updated)
    }

    /// Removing an id that is not in the set is a no-op. Returns `None` for
    /// an unknown user.
    pub fn remove_favourite(&self, user_id: &str, listing_id: &str) -> Result<Option<User>> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut table = write_txn.open_table(USERS)?;

            let current = match table.get(user_id)? {
                Some(raw) => Some(serde_json::from_slice::<User>(raw.value())?),
                None => None,
            };

            match current {
                Some(mut user) => {
                    user.favourites.retain(|id| id != listing_id);
                    let json = serde_json::to_vec(&user)?;
                    table.insert(user_id, json.as_slice())?;
                    Some(user)
                }
                None => None,
            }
        };
        write_txn.commit()?;

        Ok(updated)
    }

    /// Resolves the user's favourite ids to listing documents in stored
    /// favourite order. Ids whose listing no longer exists are skipped.
    pub fn favourite_listings(&self, user: &User) -> Result<Vec<Listing>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(LISTINGS)?;

        let mut listings = Vec::with_capacity(user.favourites.len());
        for id in &user.favourites {
            if let Some(raw) = table.get(id.as_str())? {
                listings.push(serde_json::from_slice(raw.value())?);
            }
        }
        Ok(listings)
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64
}

/// Stable sort, so listings with equal sort keys keep their scan order.
fn sort_listings(listings: &mut [Listing], field: SortField, order: SortOrder) {
    listings.sort_by(|a, b| {
        let ordering = match field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::RegularPrice => a.regular_price.cmp(&b.regular_price),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}
