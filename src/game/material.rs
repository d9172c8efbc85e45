name_table! {
    /// Block materials the engine can place.
    pub enum Material ("block material") {
        Air => "AIR",
        Stone => "STONE",
        Granite => "GRANITE",
        Diorite => "DIORITE",
        Andesite => "ANDESITE",
        Deepslate => "DEEPSLATE",
        GrassBlock => "GRASS_BLOCK",
        Dirt => "DIRT",
        CoarseDirt => "COARSE_DIRT",
        Podzol => "PODZOL",
        Cobblestone => "COBBLESTONE",
        MossyCobblestone => "MOSSY_COBBLESTONE",
        Bedrock => "BEDROCK",
        Sand => "SAND",
        RedSand => "RED_SAND",
        Gravel => "GRAVEL",
        Clay => "CLAY",
        Sandstone => "SANDSTONE",
        OakPlanks => "OAK_PLANKS",
        SprucePlanks => "SPRUCE_PLANKS",
        BirchPlanks => "BIRCH_PLANKS",
        JunglePlanks => "JUNGLE_PLANKS",
        AcaciaPlanks => "ACACIA_PLANKS",
        DarkOakPlanks => "DARK_OAK_PLANKS",
        OakLog => "OAK_LOG",
        SpruceLog => "SPRUCE_LOG",
        BirchLog => "BIRCH_LOG",
        OakLeaves => "OAK_LEAVES",
        CoalOre => "COAL_ORE",
        IronOre => "IRON_ORE",
        GoldOre => "GOLD_ORE",
        DiamondOre => "DIAMOND_ORE",
        CoalBlock => "COAL_BLOCK",
        IronBlock => "IRON_BLOCK",
        GoldBlock => "GOLD_BLOCK",
        DiamondBlock => "DIAMOND_BLOCK",
        EmeraldBlock => "EMERALD_BLOCK",
        Glass => "GLASS",
        WhiteWool => "WHITE_WOOL",
        RedWool => "RED_WOOL",
        BlueWool => "BLUE_WOOL",
        Bricks => "BRICKS",
        StoneBricks => "STONE_BRICKS",
        Tnt => "TNT",
        Bookshelf => "BOOKSHELF",
        Obsidian => "OBSIDIAN",
        Torch => "TORCH",
        CraftingTable => "CRAFTING_TABLE",
        Furnace => "FURNACE",
        Chest => "CHEST",
        Ice => "ICE",
        SnowBlock => "SNOW_BLOCK",
        Pumpkin => "PUMPKIN",
        HayBlock => "HAY_BLOCK",
        Terracotta => "TERRACOTTA",
        QuartzBlock => "QUARTZ_BLOCK",
        Prismarine => "PRISMARINE",
        SeaLantern => "SEA_LANTERN",
        Netherrack => "NETHERRACK",
        SoulSand => "SOUL_SAND",
        Glowstone => "GLOWSTONE",
        EndStone => "END_STONE",
        Water => "WATER",
        Lava => "LAVA",
    }
}
