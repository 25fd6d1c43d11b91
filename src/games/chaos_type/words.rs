use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

/// Something that hands out the next word to type.
pub trait WordSource {
    fn generate(&mut self) -> String;
}

const WORDS: &[&str] = &[
    "able", "about", "above", "across", "act", "add", "after", "again", "air", "all",
    "almost", "along", "also", "always", "animal", "answer", "any", "apple", "area", "arm",
    "around", "ask", "away", "baby", "back", "bad", "ball", "bank", "base", "bear",
    "beat", "bed", "before", "began", "behind", "bell", "best", "better", "big", "bird",
    "black", "blood", "blue", "board", "boat", "body", "bone", "book", "both", "box",
    "boy", "bread", "bright", "bring", "brother", "brown", "build", "busy", "buy", "cake",
    "call", "came", "camp", "car", "care", "carry", "case", "cat", "catch", "cell",
    "chair", "change", "check", "child", "city", "class", "clean", "clear", "close", "cloud",
    "coast", "cold", "color", "come", "common", "cook", "cool", "copy", "corn", "cost",
    "count", "cover", "cross", "crowd", "cry", "cut", "dance", "dark", "day", "dead",
    "deep", "desk", "door", "down", "draw", "dream", "dress", "drink", "drive", "drop",
    "dry", "early", "earth", "east", "easy", "eat", "edge", "egg", "end", "enemy",
    "even", "event", "every", "eye", "face", "fact", "fall", "farm", "fast", "fear",
    "feel", "field", "fight", "fill", "find", "fine", "fire", "first", "fish", "flat",
    "floor", "flower", "fly", "follow", "food", "foot", "forest", "free", "fresh", "friend",
    "front", "fruit", "full", "game", "garden", "gate", "gift", "girl", "give", "glass",
    "gold", "good", "grass", "great", "green", "ground", "group", "grow", "guess", "half",
    "hand", "happy", "hard", "hat", "head", "hear", "heart", "heat", "heavy", "help",
    "high", "hill", "hold", "hole", "home", "hope", "horse", "hot", "house", "huge",
    "ice", "idea", "inch", "iron", "island", "job", "join", "jump", "keep", "key",
    "kind", "king", "knee", "know", "lake", "land", "large", "last", "late", "laugh",
    "lead", "leaf", "learn", "leave", "left", "leg", "letter", "level", "light", "line",
    "lion", "list", "little", "live", "long", "look", "lost", "loud", "love", "low",
    "machine", "main", "make", "map", "mark", "market", "match", "meat", "meet", "metal",
    "middle", "milk", "mind", "minute", "money", "month", "moon", "morning", "mother", "mountain",
    "mouth", "move", "music", "name", "near", "neck", "need", "never", "new", "night",
    "noise", "north", "nose", "number", "ocean", "office", "oil", "old", "open", "orange",
    "page", "paint", "paper", "party", "pass", "path", "pen", "people", "picture", "piece",
    "plan", "plant", "play", "point", "pool", "power", "press", "pull", "push", "queen",
    "quick", "quiet", "race", "rain", "reach", "read", "ready", "red", "rest", "rich",
    "ride", "right", "ring", "river", "road", "rock", "roll", "room", "root", "rope",
    "round", "rule", "run", "safe", "salt", "sand", "save", "school", "sea", "seat",
    "seed", "send", "shape", "share", "ship", "shoe", "short", "show", "side", "sign",
    "silver", "simple", "sing", "sister", "sit", "size", "skin", "sky", "sleep", "slow",
    "small", "smile", "snow", "soft", "soil", "song", "sound", "south", "space", "speak",
    "speed", "spring", "square", "stand", "star", "start", "stay", "steel", "step", "stick",
    "stone", "stop", "store", "storm", "story", "street", "strong", "sugar", "summer", "sun",
    "swim", "table", "tail", "take", "talk", "tall", "teach", "team", "tell", "test",
    "thick", "thin", "think", "throw", "tiny", "tired", "tool", "top", "town", "track",
    "train", "tree", "trip", "truck", "true", "turn", "type", "under", "unit", "upon",
    "valley", "voice", "wait", "walk", "wall", "warm", "wash", "watch", "water", "wave",
    "wear", "week", "west", "wheel", "white", "wide", "wild", "wind", "window", "wing",
    "winter", "wire", "wish", "wonder", "wood", "word", "work", "world", "write", "yard",
    "year", "yellow", "young", "zero",
];

/// Uniform draw from the built-in list of short lowercase words.
pub struct RandomWords {
    rng: StdRng,
}

impl RandomWords {
    pub fn new() -> Self {
        Self { rng: StdRng::from_os_rng() }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Default for RandomWords {
    fn default() -> Self {
        Self::new()
    }
}

impl WordSource for RandomWords {
    fn generate(&mut self) -> String {
        WORDS.choose(&mut self.rng).copied().unwrap_or("word").to_string()
    }
}

/// Cycles through a fixed list. Handy when a test needs to know what spawns next.
pub struct FixedWords {
    words: Vec<String>,
    next: usize,
}

impl FixedWords {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
            next: 0,
        }
    }
}

impl WordSource for FixedWords {
    fn generate(&mut self) -> String {
        if self.words.is_empty() {
            return String::new();
        }
        let word = self.words[self.next % self.words.len()].clone();
        self.next += 1;
        word
    }
}
