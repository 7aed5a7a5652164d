//! Pet database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::Pet;

const PET_COLUMNS: &str = "id, user_id, name, species, breed, age_years, weight_kg, \
                           photo_url, created_at, updated_at";

fn pet_from_row(row: &Row<'_>) -> rusqlite::Result<Pet> {
    Ok(Pet {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        species: row.get(3)?,
        breed: row.get(4)?,
        age_years: row.get(5)?,
        weight_kg: row.get(6)?,
        photo_url: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

impl Database {
    /// Insert a new pet.
    pub fn insert_pet(&self, pet: &Pet) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO pets (
                id, user_id, name, species, breed, age_years, weight_kg,
                photo_url, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                pet.id,
                pet.user_id,
                pet.name,
                pet.species,
                pet.breed,
                pet.age_years,
                pet.weight_kg,
                pet.photo_url,
                pet.created_at,
                pet.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Update an existing pet owned by `pet.user_id`.
    pub fn update_pet(&self, pet: &Pet) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE pets SET
                name = ?3,
                species = ?4,
                breed = ?5,
                age_years = ?6,
                weight_kg = ?7,
                photo_url = ?8,
                updated_at = ?9
            WHERE id = ?1 AND user_id = ?2
            "#,
            params![
                pet.id,
                pet.user_id,
                pet.name,
                pet.species,
                pet.breed,
                pet.age_years,
                pet.weight_kg,
                pet.photo_url,
                pet.updated_at,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a pet by ID, only if owned by `user_id`.
    pub fn get_pet(&self, id: &str, user_id: &str) -> DbResult<Option<Pet>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM pets WHERE id = ? AND user_id = ?", PET_COLUMNS),
                [id, user_id],
                pet_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List a user's pets by name.
    pub fn list_pets(&self, user_id: &str) -> DbResult<Vec<Pet>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM pets WHERE user_id = ? ORDER BY name, created_at",
            PET_COLUMNS
        ))?;

        let rows = stmt.query_map([user_id], pet_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Count a user's pets (for plan limits).
    pub fn count_pets(&self, user_id: &str) -> DbResult<u32> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM pets WHERE user_id = ?",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete a pet. Its medications and reminders cascade; history stays.
    pub fn delete_pet(&self, id: &str, user_id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM pets WHERE id = ? AND user_id = ?", [id, user_id])?;
        Ok(rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();

        let mut pet = Pet::new("user-1".into(), "Max".into(), "dog".into());
        pet.breed = Some("Golden Retriever".into());
        pet.weight_kg = Some(30.0);
        pet.age_years = Some(4);

        db.insert_pet(&pet).unwrap();

        let retrieved = db.get_pet(&pet.id, "user-1").unwrap().unwrap();
        assert_eq!(retrieved, pet);
    }

    #[test]
    fn test_get_scoped_to_owner() {
        let db = setup_db();
        let pet = Pet::new("user-1".into(), "Max".into(), "dog".into());
        db.insert_pet(&pet).unwrap();

        assert!(db.get_pet(&pet.id, "user-2").unwrap().is_none());
        assert!(!db.delete_pet(&pet.id, "user-2").unwrap());
        assert_eq!(db.count_pets("user-1").unwrap(), 1);
    }

    #[test]
    fn test_update_pet() {
        let db = setup_db();

        let mut pet = Pet::new("user-1".into(), "Max".into(), "dog".into());
        db.insert_pet(&pet).unwrap();

        pet.weight_kg = Some(32.0);
        pet.photo_url = Some("https://cdn.example/max.jpg".into());
        assert!(db.update_pet(&pet).unwrap());

        let retrieved = db.get_pet(&pet.id, "user-1").unwrap().unwrap();
        assert_eq!(retrieved.weight_kg, Some(32.0));
        assert_eq!(retrieved.photo_url, Some("https://cdn.example/max.jpg".into()));
    }

    #[test]
    fn test_list_and_count() {
        let db = setup_db();

        db.insert_pet(&Pet::new("user-1".into(), "Luna".into(), "cat".into()))
            .unwrap();
        db.insert_pet(&Pet::new("user-1".into(), "Max".into(), "dog".into()))
            .unwrap();
        db.insert_pet(&Pet::new("user-2".into(), "Bella".into(), "dog".into()))
            .unwrap();

        let pets = db.list_pets("user-1").unwrap();
        assert_eq!(pets.len(), 2);
        assert_eq!(pets[0].name, "Luna");
        assert_eq!(pets[1].name, "Max");
        assert_eq!(db.count_pets("user-1").unwrap(), 2);
        assert_eq!(db.count_pets("user-3").unwrap(), 0);
    }
}
