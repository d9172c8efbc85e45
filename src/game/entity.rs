name_table! {
    /// Entity kinds the engine can spawn.
    pub enum EntityType ("entity type") {
        Zombie => "ZOMBIE",
        Husk => "HUSK",
        Drowned => "DROWNED",
        Skeleton => "SKELETON",
        Stray => "STRAY",
        Creeper => "CREEPER",
        Spider => "SPIDER",
        CaveSpider => "CAVE_SPIDER",
        Enderman => "ENDERMAN",
        Witch => "WITCH",
        Slime => "SLIME",
        Blaze => "BLAZE",
        Ghast => "GHAST",
        Phantom => "PHANTOM",
        Pig => "PIG",
        Cow => "COW",
        Sheep => "SHEEP",
        Chicken => "CHICKEN",
        Horse => "HORSE",
        Wolf => "WOLF",
        Cat => "CAT",
        Fox => "FOX",
        Rabbit => "RABBIT",
        Bee => "BEE",
        Bat => "BAT",
        Squid => "SQUID",
        Villager => "VILLAGER",
        IronGolem => "IRON_GOLEM",
        SnowGolem => "SNOW_GOLEM",
        ArmorStand => "ARMOR_STAND",
        Tnt => "TNT",
        ExperienceOrb => "EXPERIENCE_ORB",
    }
}
