// Hand-curated classification tables. One authoritative entry per venue.
use crate::model::Cuisine;

/// Exact venue names whose cuisine keywords would mislead (or that have none).
/// The optional second tag is only used for the steak + seafood pairing.
pub const KNOWN_VENUES: &[(&str, Cuisine, Option<Cuisine>)] = &[
    ("Versailles", Cuisine::Cuban, None),
    ("La Carreta", Cuisine::Cuban, None),
    ("Puerto Sagua", Cuisine::Cuban, None),
    ("Havana 1957", Cuisine::Cuban, None),
    ("Cafe La Trova", Cuisine::Cuban, None),
    ("Ball & Chain", Cuisine::Bar, None),
    ("Sweet Liberty", Cuisine::Bar, None),
    ("Broken Shaker", Cuisine::Bar, None),
    ("Mac's Club Deuce", Cuisine::Bar, None),
    ("Joe's Stone Crab", Cuisine::Seafood, None),
    ("Prime 112", Cuisine::Steakhouse, None),
    ("Smith & Wollensky", Cuisine::Steakhouse, Some(Cuisine::Seafood)),
    ("Cote Miami", Cuisine::Korean, None),
    ("Carbone", Cuisine::Italian, None),
    ("Fiola", Cuisine::Italian, None),
    ("Zuma", Cuisine::Japanese, None),
    ("Nobu", Cuisine::Japanese, None),
    ("Nobu Miami", Cuisine::Japanese, None),
    ("Hiden", Cuisine::Japanese, None),
    ("Ogawa", Cuisine::Japanese, None),
    ("Azabu", Cuisine::Japanese, None),
    ("Chotto Matte", Cuisine::Japanese, None),
    ("Komodo", Cuisine::AsianFusion, None),
    ("Kyu", Cuisine::AsianFusion, None),
    ("Sexy Fish", Cuisine::AsianFusion, None),
    ("Hakkasan", Cuisine::Chinese, None),
    ("La Mar", Cuisine::Peruvian, None),
    ("Mandolin Aegean Bistro", Cuisine::Greek, None),
    ("Estiatorio Milos", Cuisine::Greek, None),
    ("Los Fuegos by Francis Mallmann", Cuisine::Argentinian, None),
    ("Le Jardinier", Cuisine::French, None),
    ("L'Atelier de Joel Robuchon", Cuisine::French, None),
    ("Stubborn Seed", Cuisine::American, None),
    ("The Surf Club Restaurant", Cuisine::American, None),
    ("Yardbird", Cuisine::American, None),
    ("Michael's Genuine", Cuisine::American, None),
    ("Ariete", Cuisine::American, None),
    ("Pollo Tropical", Cuisine::FastFood, None),
    ("Pura Vida", Cuisine::Vegan, None),
    ("Walgreens", Cuisine::Delete, None),
    ("CVS Pharmacy", Cuisine::Delete, None),
];

/// Provider category tags (Yelp aliases and titles, Google place types).
/// Compared through `category_key`, so "Sushi Bars" and "sushi" style spellings both work.
pub const PROVIDER_CATEGORIES: &[(&str, Cuisine)] = &[
    ("pizza", Cuisine::Pizza),
    ("italian", Cuisine::Italian),
    ("japanese", Cuisine::Japanese),
    ("sushi", Cuisine::Japanese),
    ("sushi_bars", Cuisine::Japanese),
    ("ramen", Cuisine::Japanese),
    ("chinese", Cuisine::Chinese),
    ("dimsum", Cuisine::Chinese),
    ("cantonese", Cuisine::Chinese),
    ("szechuan", Cuisine::Chinese),
    ("thai", Cuisine::Thai),
    ("vietnamese", Cuisine::Vietnamese),
    ("korean", Cuisine::Korean),
    ("asianfusion", Cuisine::AsianFusion),
    ("panasian", Cuisine::AsianFusion),
    ("poke", Cuisine::AsianFusion),
    ("indpak", Cuisine::Indian),
    ("indian", Cuisine::Indian),
    ("mexican", Cuisine::Mexican),
    ("tacos", Cuisine::Mexican),
    ("tex-mex", Cuisine::Mexican),
    ("cuban", Cuisine::Cuban),
    ("latin", Cuisine::Latin),
    ("latin_american", Cuisine::Latin),
    ("peruvian", Cuisine::Peruvian),
    ("argentine", Cuisine::Argentinian),
    ("brazilian", Cuisine::Brazilian),
    ("venezuelan", Cuisine::Venezuelan),
    ("colombian", Cuisine::Colombian),
    ("caribbean", Cuisine::Caribbean),
    ("haitian", Cuisine::Caribbean),
    ("spanish", Cuisine::Spanish),
    ("tapas", Cuisine::Spanish),
    ("tapasmallplates", Cuisine::Spanish),
    ("french", Cuisine::French),
    ("mediterranean", Cuisine::Mediterranean),
    ("greek", Cuisine::Greek),
    ("mideastern", Cuisine::MiddleEastern),
    ("middle_eastern", Cuisine::MiddleEastern),
    ("lebanese", Cuisine::MiddleEastern),
    ("turkish", Cuisine::MiddleEastern),
    ("seafood", Cuisine::Seafood),
    ("steak", Cuisine::Steakhouse),
    ("steakhouses", Cuisine::Steakhouse),
    ("steak_house", Cuisine::Steakhouse),
    ("burgers", Cuisine::Burgers),
    ("hamburger", Cuisine::Burgers),
    ("bbq", Cuisine::Bbq),
    ("barbeque", Cuisine::Bbq),
    ("delis", Cuisine::Deli),
    ("sandwiches", Cuisine::Deli),
    ("sandwich_shop", Cuisine::Deli),
    ("cafes", Cuisine::Cafe),
    ("cafe", Cuisine::Cafe),
    ("coffee", Cuisine::Cafe),
    ("coffee_shop", Cuisine::Cafe),
    ("bakeries", Cuisine::Bakery),
    ("bakery", Cuisine::Bakery),
    ("desserts", Cuisine::Dessert),
    ("icecream", Cuisine::Dessert),
    ("ice_cream_shop", Cuisine::Dessert),
    ("breakfast_brunch", Cuisine::Breakfast),
    ("breakfast", Cuisine::Breakfast),
    ("brunch", Cuisine::Breakfast),
    ("diners", Cuisine::Breakfast),
    ("vegan", Cuisine::Vegan),
    ("vegetarian", Cuisine::Vegan),
    ("hotdogs", Cuisine::FastFood),
    ("fast_food", Cuisine::FastFood),
    ("chicken_wings", Cuisine::FastFood),
    ("bars", Cuisine::Bar),
    ("bar", Cuisine::Bar),
    ("cocktailbars", Cuisine::Bar),
    ("wine_bars", Cuisine::Bar),
    ("pubs", Cuisine::Bar),
    ("sportsbars", Cuisine::Bar),
    ("beergardens", Cuisine::Bar),
    ("breweries", Cuisine::Bar),
    ("lounges", Cuisine::Bar),
    ("night_club", Cuisine::Bar),
    ("newamerican", Cuisine::American),
    ("tradamerican", Cuisine::American),
    ("american", Cuisine::American),
    ("gastropubs", Cuisine::American),
];

/// Keyword patterns over lowercased name + description, in priority order.
/// Non-venues come last: a food keyword anywhere outranks them.
pub const KEYWORD_PATTERNS: &[(&str, &str, Cuisine)] = &[
    ("pizza", r"pizz(?:a|eria)", Cuisine::Pizza),
    ("japanese", r"\b(?:sushi|ramen|izakaya|omakase|japanese|yakitori|teppanyaki|hibachi|udon|robata)\b", Cuisine::Japanese),
    ("brazilian", r"\b(?:brazilian|churrascaria|rodizio)\b", Cuisine::Brazilian),
    ("korean", r"\b(?:korean|bibimbap|kbbq)\b", Cuisine::Korean),
    ("steakhouse", r"\b(?:steak\s?house|steaks?|chop\s?house)\b", Cuisine::Steakhouse),
    ("peruvian", r"\b(?:peruvian|ceviches?|cevicheria|nikkei|lomo saltado|pollo a la brasa)\b", Cuisine::Peruvian),
    ("seafood", r"\b(?:seafood|fish|oysters?|crabs?|lobsters?|raw bar|shrimp|mariscos|fish market)\b", Cuisine::Seafood),
    ("mexican", r"\b(?:tacos?|taqueria|mexican|burritos?|cantina|mezcal|tex\W?mex)\b", Cuisine::Mexican),
    ("cuban", r"\b(?:cuban|cubano|havana|cafecito|ventanita|croquetas?)\b", Cuisine::Cuban),
    ("italian", r"\b(?:italian|trattoria|osteria|ristorante|pasta|enoteca|pastificio)\b", Cuisine::Italian),
    ("chinese", r"\b(?:chinese|dim sum|dumplings?|szechuan|sichuan|cantonese|wok)\b", Cuisine::Chinese),
    ("thai", r"\bthai\b", Cuisine::Thai),
    ("vietnamese", r"\b(?:vietnamese|pho|banh mi)\b", Cuisine::Vietnamese),
    ("indian", r"\b(?:indian|curry|tandoori?|masala)\b", Cuisine::Indian),
    ("asian", r"\b(?:asian|pan\W?asian|poke)\b", Cuisine::AsianFusion),
    ("argentinian", r"\b(?:argentin\w*|parrilla|empanadas?)\b", Cuisine::Argentinian),
    ("venezuelan", r"\b(?:venezuelan|arepas?|arepera)\b", Cuisine::Venezuelan),
    ("colombian", r"\b(?:colombian|bandeja)\b", Cuisine::Colombian),
    ("caribbean", r"\b(?:caribbean|jamaican|haitian|jerk|trinidadian|dominican|puerto rican)\b", Cuisine::Caribbean),
    ("spanish", r"\b(?:spanish|tapas|paella|jamon)\b", Cuisine::Spanish),
    ("greek", r"\b(?:greek|gyros?|souvlaki|taverna|aegean)\b", Cuisine::Greek),
    ("middle eastern", r"\b(?:lebanese|middle eastern|falafel|shawarma|hummus|turkish|persian|israeli)\b", Cuisine::MiddleEastern),
    ("mediterranean", r"\bmediterranean\b", Cuisine::Mediterranean),
    ("french", r"\b(?:french|brasserie|creperie|crepes?)\b", Cuisine::French),
    ("bbq", r"\b(?:bbq|barbecue|barbeque|smokehouse)\b", Cuisine::Bbq),
    ("burgers", r"\b(?:burgers?|hamburgers?)\b", Cuisine::Burgers),
    ("deli", r"\b(?:deli|delicatessen|sandwich(?:es|erie)?|bagels?)\b", Cuisine::Deli),
    ("breakfast", r"\b(?:breakfast|brunch|pancakes?|waffles?|diner)\b", Cuisine::Breakfast),
    ("vegan", r"\b(?:vegan|vegetarian|plant\W?based|juice bar|acai)\b", Cuisine::Vegan),
    ("bakery", r"\b(?:bakery|bakeshop|panaderia|pastelitos?|patisserie|donuts?|doughnuts?)\b", Cuisine::Bakery),
    ("dessert", r"\b(?:desserts?|ice cream|gelato|helados?|heladeria|frozen yogurt|cupcakes?|churros?)\b", Cuisine::Dessert),
    ("cafe", r"\b(?:cafe|café|coffee|espresso|teahouse|tea house)\b", Cuisine::Cafe),
    ("fast food", r"\b(?:fast food|drive\W?thru|fried chicken|wings)\b", Cuisine::FastFood),
    ("bar", r"\b(?:bar|pub|tavern|lounge|saloon|brewery|brewing|taproom|cocktails?|speakeasy|beer garden|nightclub)\b", Cuisine::Bar),
    ("american", r"\b(?:american|grill|grille|gastropub)\b", Cuisine::American),
    ("non-venue", r"\b(?:pharmacy|walgreens|cvs|gas station|laundromat|dry cleaners?|car wash|auto repair|parking garage|atm)\b", Cuisine::Delete),
];

/// Seafood indicators checked after a Steakhouse hit.
pub const SEAFOOD_PATTERN: &str = r"\b(?:seafood|fish|oysters?|crabs?|lobsters?|raw bar|shrimp|mariscos)\b";

/// Venues priced above what provider scales can express.
pub const ULTRA_LUXURY_VENUES: &[&str] = &[
    "Carbone",
    "Cote Miami",
    "Papi Steak",
    "Prime 112",
    "Nobu Miami",
    "Zuma",
    "L'Atelier de Joel Robuchon",
    "Le Jardinier",
    "Hiden",
    "Ogawa",
    "The Surf Club Restaurant",
];
