//! Locating and decoding the player actor of a save.

use visage_changeform::{ChangeFlags, ChangeformTable, PlayerActorData, PlayerIdentity};
use visage_save::SaveFile;

use crate::error::Result;

/// The player's actor record together with the table it lives in.
#[derive(Debug, Clone)]
pub struct PlayerRecord<'a> {
    pub table: ChangeformTable<'a>,
    pub index: usize,
    pub flags: ChangeFlags,
    pub actor: PlayerActorData,
}

impl<'a> PlayerRecord<'a> {
    /// Decode the changeform table of `save` and its player actor.
    pub fn load(save: &'a SaveFile) -> Result<Self> {
        let flavor = save.flavor();
        let (region, count) = save.changeform_region()?;
        let table = ChangeformTable::decode(region, count)?;
        let index = table.find_player(flavor)?;

        let record = &table.records()[index];
        let flags = record.flags();
        let actor = PlayerActorData::decode(
            &record.payload()?,
            flags,
            flavor,
            PlayerIdentity::from_header(save.header()),
        )?;

        Ok(Self {
            table,
            index,
            flags,
            actor,
        })
    }
}
