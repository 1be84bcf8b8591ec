//! Shops, inns and the key seller.
//!
//! Gear bought at an arms shop replaces whatever sits in the same slot, and
//! the old piece is taken back for half its price. Nothing is charged until
//! the hero has agreed to every prompt.

use core::fmt;

use tracing::info;

use crate::{
    GameSession,
    dialog::text,
    host::{Host, Music, Window},
    player::items::{Armor, HERB_PRICE, Item, KEY_PRICE, MAX_KEYS, Shield, Weapon},
};

/// Something on a shop's shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ware {
    Weapon(Weapon),
    Armor(Armor),
    Shield(Shield),
    Item(Item),
    Herb,
}

impl Ware {
    pub const fn price(self) -> u16 {
        match self {
            Self::Weapon(weapon) => weapon.price(),
            Self::Armor(armor) => armor.price(),
            Self::Shield(shield) => shield.price(),
            Self::Item(item) => item.price(),
            Self::Herb => HERB_PRICE,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Weapon(weapon) => weapon.name(),
            Self::Armor(armor) => armor.name(),
            Self::Shield(shield) => shield.name(),
            Self::Item(item) => item.name(),
            Self::Herb => "Herb",
        }
    }
}

impl fmt::Display for Ware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub static BRECCONARY_ARMS: &[Ware] = &[
    Ware::Weapon(Weapon::BambooPole),
    Ware::Weapon(Weapon::Club),
    Ware::Weapon(Weapon::CopperSword),
    Ware::Armor(Armor::Clothes),
    Ware::Armor(Armor::LeatherArmor),
    Ware::Shield(Shield::SmallShield),
];

pub static BRECCONARY_TOOLS: &[Ware] = &[
    Ware::Herb,
    Ware::Item(Item::Torch),
    Ware::Item(Item::FairyWater),
    Ware::Item(Item::Wings),
    Ware::Item(Item::DragonsScale),
];

pub const BRECCONARY_INN_PRICE: u16 = 6;

/// Gold paid back for gear being replaced.
pub const fn trade_in_value(price: u16) -> u16 {
    price / 2
}

impl<H: Host> GameSession<H> {
    /// Picks a ware from `wares`; `None` when the hero walks away.
    fn pick_ware(&mut self, wares: &[Ware]) -> Option<Ware> {
        if self.host.powered_off() {
            return None;
        }
        self.say(text::SHOP_BUY_WHAT);
        let index = self.host.show_window(Window::Shop(wares)).index()?;
        wares.get(index).copied()
    }

    /// The piece `ware` would replace, as its name and trade-in value.
    fn replaced_gear(&self, ware: Ware) -> Option<(&'static str, u16)> {
        let equipment = self.player.equipment();
        let (name, price, empty) = match ware {
            Ware::Weapon(_) => (
                equipment.weapon.name(),
                equipment.weapon.price(),
                equipment.weapon == Weapon::None,
            ),
            Ware::Armor(_) => (
                equipment.armor.name(),
                equipment.armor.price(),
                equipment.armor == Armor::None,
            ),
            Ware::Shield(_) => (
                equipment.shield.name(),
                equipment.shield.price(),
                equipment.shield == Shield::None,
            ),
            Ware::Item(_) | Ware::Herb => return None,
        };
        (!empty).then_some((name, trade_in_value(price)))
    }

    pub(crate) fn visit_arms_shop(&mut self, wares: &[Ware]) {
        self.say(text::SHOP_WELCOME);
        while let Some(ware) = self.pick_ware(wares) {
            let price = ware.price();
            if self.player.gold() < price {
                self.say(text::SHOP_NOT_ENOUGH_GOLD);
                continue;
            }
            let trade_in = match self.replaced_gear(ware) {
                Some((name, value)) => {
                    self.say_args(text::SHOP_TRADE_IN, Some(value.into()), Some(name));
                    if !self.confirm() {
                        continue;
                    }
                    value
                }
                None => 0,
            };
            self.player.spend_gold(price);
            self.player.add_gold(trade_in);
            let equipment = self.player.equipment_mut();
            match ware {
                Ware::Weapon(weapon) => equipment.weapon = weapon,
                Ware::Armor(armor) => equipment.armor = armor,
                Ware::Shield(shield) => equipment.shield = shield,
                Ware::Item(_) | Ware::Herb => {}
            }
            info!(%ware, price, trade_in, gold = self.player.gold(), "bought gear");
            self.say_subject(text::SHOP_THANK_YOU, ware.name());
        }
        self.say(text::SHOP_COME_AGAIN);
    }

    pub(crate) fn visit_tool_shop(&mut self, wares: &[Ware]) {
        self.say(text::SHOP_WELCOME);
        while let Some(ware) = self.pick_ware(wares) {
            let price = ware.price();
            if self.player.gold() < price {
                self.say(text::SHOP_NOT_ENOUGH_GOLD);
                continue;
            }
            let inventory = self.player.inventory_mut();
            let stored = match ware {
                Ware::Herb => inventory.add_herb(),
                Ware::Item(item) => inventory.add_item(item).is_ok(),
                Ware::Weapon(_) | Ware::Armor(_) | Ware::Shield(_) => false,
            };
            if !stored {
                self.say_subject(text::SHOP_CANNOT_CARRY, ware.name());
                continue;
            }
            self.player.spend_gold(price);
            info!(%ware, price, gold = self.player.gold(), "bought item");
            self.say_subject(text::SHOP_THANK_YOU, ware.name());
        }
        self.say(text::SHOP_COME_AGAIN);
    }

    /// A night's rest: full HP and MP for `price` gold.
    pub(crate) fn visit_inn(&mut self, price: u16) {
        self.say_number(text::INN_OFFER, price);
        if !self.confirm() {
            self.say(text::INN_COME_AGAIN);
            return;
        }
        if !self.player.spend_gold(price) {
            self.say(text::SHOP_NOT_ENOUGH_GOLD);
            return;
        }
        self.say(text::INN_GOOD_NIGHT);
        self.fade_out();
        self.host.play_music(Music::Inn);
        self.wait_for_track_end();
        self.player.restore();
        self.host.play_music(self.map_id().layout().music);
        self.fade_in();
        info!(price, "rested at the inn");
        self.say(text::INN_GOOD_MORNING);
    }

    pub(crate) fn visit_key_seller(&mut self) {
        self.say_number(text::KEY_OFFER, KEY_PRICE);
        if !self.confirm() {
            self.say(text::SHOP_COME_AGAIN);
            return;
        }
        if self.player.inventory().keys() >= MAX_KEYS {
            self.say(text::KEY_CANNOT_CARRY);
            return;
        }
        if !self.player.spend_gold(KEY_PRICE) {
            self.say(text::SHOP_NOT_ENOUGH_GOLD);
            return;
        }
        self.player.inventory_mut().add_key();
        self.say_subject(text::SHOP_THANK_YOU, "Magic Key");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameConfig, host::scripted::ScriptedHost, player::Player};

    fn shopper(script: &str, gold: u16) -> GameSession<ScriptedHost> {
        let host = ScriptedHost::from_script(script).expect("valid script");
        let mut session = GameSession::new(host, GameConfig::default());
        session.player = Player::new("Loto");
        session.player.set_gold(gold);
        session
    }

    #[test]
    fn trade_in_pays_half() {
        let mut session = shopper("select 2\nyes\ncancel", 200);
        session.player.equipment_mut().weapon = Weapon::Club;
        session.visit_arms_shop(BRECCONARY_ARMS);
        assert_eq!(session.player().equipment().weapon, Weapon::CopperSword);
        assert_eq!(session.player().gold(), 200 - 180 + 30);
        assert!(session.host().saw_text(text::SHOP_TRADE_IN));
    }

    #[test]
    fn declined_trade_in_costs_nothing() {
        let mut session = shopper("select 2\nno\ncancel", 200);
        session.player.equipment_mut().weapon = Weapon::Club;
        session.visit_arms_shop(BRECCONARY_ARMS);
        assert_eq!(session.player().equipment().weapon, Weapon::Club);
        assert_eq!(session.player().gold(), 200);
    }

    #[test]
    fn short_of_gold() {
        let mut session = shopper("select 5\ncancel", 10);
        session.visit_arms_shop(BRECCONARY_ARMS);
        assert_eq!(session.player().equipment().shield, Shield::None);
        assert_eq!(session.player().gold(), 10);
        assert!(session.host().saw_text(text::SHOP_NOT_ENOUGH_GOLD));
    }

    #[test]
    fn tool_shop_respects_the_herb_limit() {
        let mut session = shopper("select 0\ncancel", 100);
        for _ in 0..6 {
            session.player.inventory_mut().add_herb();
        }
        session.visit_tool_shop(BRECCONARY_TOOLS);
        assert_eq!(session.player().gold(), 100);
        assert!(session.host().saw_text(text::SHOP_CANNOT_CARRY));

        let mut session = shopper("select 1\ncancel", 100);
        session.visit_tool_shop(BRECCONARY_TOOLS);
        assert!(session.player().inventory().contains(Item::Torch));
        assert_eq!(session.player().gold(), 92);
    }

    #[test]
    fn inn_restores_for_a_fee() {
        let mut session = shopper("yes\nidle 100", 10);
        session.player.set_hp(1);
        session.visit_inn(BRECCONARY_INN_PRICE);
        assert_eq!(session.player().hp(), session.player().max_hp());
        assert_eq!(session.player().gold(), 4);
        assert!(session.host().played_music(Music::Inn));

        let mut session = shopper("yes\nidle 1", 5);
        session.player.set_hp(1);
        session.visit_inn(BRECCONARY_INN_PRICE);
        assert_eq!(session.player().hp(), 1);
    }

    #[test]
    fn key_seller_charges_once() {
        let mut session = shopper("yes", 60);
        session.visit_key_seller();
        assert_eq!(session.player().inventory().keys(), 1);
        assert_eq!(session.player().gold(), 60 - KEY_PRICE);
    }
}
