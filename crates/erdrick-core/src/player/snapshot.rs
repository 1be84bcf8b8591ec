//! Compact binary snapshots of the hero, for tooling and debugging.
//!
//! Unlike the 32-byte save record these keep every field verbatim and carry
//! no checksum.

use crate::{Error, player::Player};

pub fn to_postcard(player: &Player) -> Result<Vec<u8>, Error> {
    Ok(postcard::to_stdvec(player)?)
}

pub fn from_postcard(bytes: &[u8]) -> Result<Player, Error> {
    Ok(postcard::from_bytes(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::items::Item;

    #[test]
    fn snapshot_keeps_every_field() {
        let mut player = Player::new("Gwaelin");
        player.add_gold(321);
        player.gain_experience(500);
        player
            .inventory_mut()
            .add_item(Item::SilverHarp)
            .expect("room");
        let bytes = to_postcard(&player).expect("encodes");
        assert_eq!(from_postcard(&bytes).expect("decodes"), player);
    }

    #[test]
    fn truncated_snapshot_is_an_error() {
        let bytes = to_postcard(&Player::new("A")).expect("encodes");
        assert!(from_postcard(&bytes[..bytes.len() / 2]).is_err());
    }
}
