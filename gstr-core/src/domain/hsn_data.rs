//! Static classification reference tables
//!
//! Goods follow chapter (2) → heading (4) → sub-heading (6) → tariff item (8).
//! Services (codes starting `99`) follow group (4) → service (6).
//! Rates are in hundredths of a percent: `1800` is 18%.

/// One row of a reference table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeEntry {
    pub code: &'static str,
    pub description: &'static str,
    pub rate: Option<u32>,
}

const fn e(code: &'static str, description: &'static str) -> CodeEntry {
    CodeEntry { code, description, rate: None }
}

const fn r(code: &'static str, description: &'static str, rate: u32) -> CodeEntry {
    CodeEntry { code, description, rate: Some(rate) }
}

pub const CHAPTERS: &[CodeEntry] = &[
    e("01", "Live animals"),
    e("02", "Meat and edible meat offal"),
    e("03", "Fish and crustaceans, molluscs and other aquatic invertebrates"),
    e("04", "Dairy produce; birds' eggs; natural honey"),
    e("05", "Products of animal origin, not elsewhere specified"),
    e("06", "Live trees and other plants; cut flowers"),
    e("07", "Edible vegetables and certain roots and tubers"),
    e("08", "Edible fruit and nuts; peel of citrus fruit or melons"),
    e("09", "Coffee, tea, mate and spices"),
    e("10", "Cereals"),
    e("11", "Products of the milling industry; malt; starches"),
    e("12", "Oil seeds and oleaginous fruits; industrial or medicinal plants"),
    e("13", "Lac; gums, resins and other vegetable saps and extracts"),
    e("14", "Vegetable plaiting materials"),
    e("15", "Animal or vegetable fats and oils"),
    e("16", "Preparations of meat, of fish or of crustaceans"),
    e("17", "Sugars and sugar confectionery"),
    e("18", "Cocoa and cocoa preparations"),
    e("19", "Preparations of cereals, flour, starch or milk; pastrycooks' products"),
    e("20", "Preparations of vegetables, fruit, nuts or other parts of plants"),
    e("21", "Miscellaneous edible preparations"),
    e("22", "Beverages, spirits and vinegar"),
    e("23", "Residues and waste from the food industries; prepared animal fodder"),
    e("24", "Tobacco and manufactured tobacco substitutes"),
    e("25", "Salt; sulphur; earths and stone; plastering materials, lime and cement"),
    e("26", "Ores, slag and ash"),
    e("27", "Mineral fuels, mineral oils and products of their distillation"),
    e("28", "Inorganic chemicals"),
    e("29", "Organic chemicals"),
    e("30", "Pharmaceutical products"),
    e("31", "Fertilisers"),
    e("32", "Tanning or dyeing extracts; dyes, pigments, paints and varnishes"),
    e("33", "Essential oils and resinoids; perfumery, cosmetic or toilet preparations"),
    e("34", "Soap, organic surface-active agents, washing preparations"),
    e("35", "Albuminoidal substances; modified starches; glues; enzymes"),
    e("36", "Explosives; pyrotechnic products; matches"),
    e("37", "Photographic or cinematographic goods"),
    e("38", "Miscellaneous chemical products"),
    e("39", "Plastics and articles thereof"),
    e("40", "Rubber and articles thereof"),
    e("41", "Raw hides and skins (other than furskins) and leather"),
    e("42", "Articles of leather; travel goods, handbags and similar containers"),
    e("43", "Furskins and artificial fur; manufactures thereof"),
    e("44", "Wood and articles of wood; wood charcoal"),
    e("45", "Cork and articles of cork"),
    e("46", "Manufactures of straw, of esparto or of other plaiting materials"),
    e("47", "Pulp of wood or of other fibrous cellulosic material"),
    e("48", "Paper and paperboard; articles of paper pulp, of paper or of paperboard"),
    e("49", "Printed books, newspapers, pictures and other products of the printing industry"),
    e("50", "Silk"),
    e("51", "Wool, fine or coarse animal hair; horsehair yarn and woven fabric"),
    e("52", "Cotton"),
    e("53", "Other vegetable textile fibres; paper yarn"),
    e("54", "Man-made filaments"),
    e("55", "Man-made staple fibres"),
    e("56", "Wadding, felt and nonwovens; special yarns; twine, cordage, ropes"),
    e("57", "Carpets and other textile floor coverings"),
    e("58", "Special woven fabrics; tufted textile fabrics; lace; tapestries"),
    e("59", "Impregnated, coated, covered or laminated textile fabrics"),
    e("60", "Knitted or crocheted fabrics"),
    e("61", "Articles of apparel and clothing accessories, knitted or crocheted"),
    e("62", "Articles of apparel and clothing accessories, not knitted or crocheted"),
    e("63", "Other made up textile articles; worn clothing"),
    e("64", "Footwear, gaiters and the like"),
    e("65", "Headgear and parts thereof"),
    e("66", "Umbrellas, sun umbrellas, walking-sticks, whips"),
    e("67", "Prepared feathers and down; artificial flowers"),
    e("68", "Articles of stone, plaster, cement, asbestos, mica or similar materials"),
    e("69", "Ceramic products"),
    e("70", "Glass and glassware"),
    e("71", "Natural or cultured pearls, precious or semi-precious stones, precious metals"),
    e("72", "Iron and steel"),
    e("73", "Articles of iron or steel"),
    e("74", "Copper and articles thereof"),
    e("75", "Nickel and articles thereof"),
    e("76", "Aluminium and articles thereof"),
    e("78", "Lead and articles thereof"),
    e("79", "Zinc and articles thereof"),
    e("80", "Tin and articles thereof"),
    e("81", "Other base metals; cermets; articles thereof"),
    e("82", "Tools, implements, cutlery, spoons and forks, of base metal"),
    e("83", "Miscellaneous articles of base metal"),
    e("84", "Nuclear reactors, boilers, machinery and mechanical appliances"),
    e("85", "Electrical machinery and equipment and parts thereof"),
    e("86", "Railway or tramway locomotives, rolling-stock and parts thereof"),
    e("87", "Vehicles other than railway or tramway rolling-stock"),
    e("88", "Aircraft, spacecraft, and parts thereof"),
    e("89", "Ships, boats and floating structures"),
    e("90", "Optical, photographic, measuring, checking, medical instruments"),
    e("91", "Clocks and watches and parts thereof"),
    e("92", "Musical instruments; parts and accessories of such articles"),
    e("93", "Arms and ammunition; parts and accessories thereof"),
    e("94", "Furniture; bedding, mattresses; lamps and lighting fittings"),
    e("95", "Toys, games and sports requisites"),
    e("96", "Miscellaneous manufactured articles"),
    e("97", "Works of art, collectors' pieces and antiques"),
];

pub const HEADINGS: &[CodeEntry] = &[
    r("0401", "Milk and cream, not concentrated nor containing added sugar", 0),
    r("0402", "Milk and cream, concentrated or containing added sugar", 500),
    r("0405", "Butter and other fats and oils derived from milk", 1200),
    r("0902", "Tea, whether or not flavoured", 500),
    r("1006", "Rice", 500),
    r("1701", "Cane or beet sugar", 500),
    r("1905", "Bread, pastry, cakes, biscuits and other bakers' wares", 1800),
    r("2106", "Food preparations not elsewhere specified", 1800),
    r("2202", "Waters, including mineral waters and aerated waters, with added sugar", 2800),
    r("2523", "Portland cement, aluminous cement, slag cement", 2800),
    r("2710", "Petroleum oils and oils obtained from bituminous minerals", 1800),
    r("3004", "Medicaments consisting of mixed or unmixed products, in measured doses", 1200),
    r("3304", "Beauty or make-up preparations", 1800),
    r("3401", "Soap; organic surface-active products for use as soap", 1800),
    r("3923", "Articles for the conveyance or packing of goods, of plastics", 1800),
    r("4011", "New pneumatic tyres, of rubber", 2800),
    r("4820", "Registers, account books, note books, letter pads", 1200),
    r("4901", "Printed books, brochures, leaflets and similar printed matter", 0),
    r("5208", "Woven fabrics of cotton", 500),
    r("6109", "T-shirts, singlets and other vests, knitted or crocheted", 500),
    r("6403", "Footwear with outer soles of rubber, plastics or leather", 1800),
    r("7113", "Articles of jewellery and parts thereof, of precious metal", 300),
    r("7308", "Structures and parts of structures, of iron or steel", 1800),
    r("7323", "Table, kitchen or other household articles of iron or steel", 1200),
    r("8414", "Air or vacuum pumps, air or other gas compressors and fans", 1800),
    r("8415", "Air conditioning machines", 2800),
    r("8418", "Refrigerators, freezers and other refrigerating equipment", 1800),
    r("8443", "Printing machinery; printers, copying machines and facsimile machines", 1800),
    r("8471", "Automatic data processing machines and units thereof", 1800),
    r("8473", "Parts and accessories of office machines", 1800),
    r("8504", "Electrical transformers, static converters and inductors", 1800),
    r("8517", "Telephone sets, including smartphones; other apparatus for transmission", 1800),
    r("8528", "Monitors and projectors; television receivers", 1800),
    r("8544", "Insulated wire, cable and other insulated electric conductors", 1800),
    r("8703", "Motor cars and other motor vehicles principally designed for persons", 2800),
    r("8711", "Motorcycles and cycles fitted with an auxiliary motor", 2800),
    r("9018", "Instruments and appliances used in medical, surgical or dental sciences", 1200),
    r("9403", "Other furniture and parts thereof", 1800),
    r("9503", "Tricycles, scooters, dolls and other toys", 1200),
    r("9608", "Ball point pens; felt tipped and other porous-tipped pens and markers", 1800),
];

pub const SUB_HEADINGS: &[CodeEntry] = &[
    r("040110", "Milk of a fat content not exceeding 1%", 0),
    r("090230", "Black tea (fermented), in immediate packings not exceeding 3 kg", 500),
    r("100630", "Semi-milled or wholly milled rice", 500),
    r("190590", "Other bakers' wares", 1800),
    r("300490", "Other medicaments, put up in measured doses", 1200),
    r("392330", "Carboys, bottles, flasks and similar articles, of plastics", 1800),
    r("482010", "Registers, account books, note books, order books, receipt books", 1200),
    r("610910", "T-shirts, singlets and other vests, of cotton", 500),
    r("730890", "Other structures and parts of structures, of iron or steel", 1800),
    r("841451", "Table, floor, wall, window, ceiling or roof fans", 1800),
    r("841510", "Air conditioning machines, window or wall types", 2800),
    r("841821", "Household refrigerators, compression-type", 1800),
    r("844332", "Other printers, capable of connecting to a data processing machine", 1800),
    r("847130", "Portable automatic data processing machines, weighing not more than 10 kg", 1800),
    r("847141", "Other automatic data processing machines comprising a CPU and input/output unit", 1800),
    r("847330", "Parts and accessories of automatic data processing machines", 1800),
    r("850440", "Static converters", 1800),
    r("851713", "Smartphones", 1800),
    r("852852", "Monitors capable of connecting to an automatic data processing machine", 1800),
    r("854449", "Other electric conductors, for a voltage not exceeding 1,000 V", 1800),
    r("940330", "Wooden furniture of a kind used in offices", 1800),
];

pub const TARIFF_ITEMS: &[CodeEntry] = &[
    r("04011000", "Milk, fat content not exceeding 1%, not concentrated", 0),
    r("09023010", "Black tea in packets", 500),
    r("10063020", "Basmati rice, semi-milled or wholly milled", 500),
    r("19059020", "Biscuits", 1800),
    r("30049099", "Other medicaments in measured doses, not elsewhere specified", 1200),
    r("48201010", "Registers, account books", 1200),
    r("61091000", "T-shirts of cotton, knitted", 500),
    r("84145110", "Table fans", 1800),
    r("84151010", "Window type air conditioners", 2800),
    r("84182100", "Household refrigerators, compression-type", 1800),
    r("84433250", "Laser jet printers", 1800),
    r("84713010", "Personal computer (laptop, notebook, palmtop)", 1800),
    r("84713090", "Other portable automatic data processing machines", 1800),
    r("84714110", "Micro computers", 1800),
    r("84733020", "Motherboards", 1800),
    r("85044030", "Battery chargers", 1800),
    r("85171300", "Smartphones for wireless networks", 1800),
    r("85285200", "Monitors capable of direct connection to a data processing machine", 1800),
    r("85444999", "Other insulated electric conductors", 1800),
    r("94033010", "Wooden office furniture", 1800),
];

pub const SERVICE_GROUPS: &[CodeEntry] = &[
    e("9954", "Construction services"),
    e("9961", "Services in wholesale trade"),
    e("9963", "Accommodation, food and beverage services"),
    e("9964", "Passenger transport services"),
    e("9965", "Goods transport services"),
    e("9967", "Supporting services in transport"),
    e("9971", "Financial and related services"),
    e("9972", "Real estate services"),
    e("9973", "Leasing or rental services without operator"),
    e("9983", "Other professional, technical and business services"),
    e("9984", "Telecommunications, broadcasting and information supply services"),
    e("9985", "Support services"),
    e("9987", "Maintenance, repair and installation (except construction) services"),
    e("9988", "Manufacturing services on physical inputs owned by others"),
    e("9992", "Education services"),
    e("9993", "Human health and social care services"),
    e("9997", "Other services"),
];

pub const SERVICES: &[CodeEntry] = &[
    r("995411", "Construction services of single dwelling or multi dwelling buildings", 1800),
    r("995415", "Construction services of industrial buildings", 1800),
    r("996311", "Room or unit accommodation services", 1200),
    r("996331", "Services provided by restaurants, cafes and similar eating facilities", 500),
    r("996511", "Road transport services of goods", 500),
    r("997111", "Central banking services", 1800),
    r("997212", "Rental or leasing services involving own or leased non-residential property", 1800),
    r("998311", "Management consulting and management services", 1800),
    r("998313", "Information technology consulting and support services", 1800),
    r("998314", "Information technology design and development services", 1800),
    r("998315", "Hosting and information technology infrastructure provisioning services", 1800),
    r("998361", "Advertising services", 1800),
    r("998431", "Online text based information such as online books, newspapers", 1800),
    r("998519", "Other employment and labour supply services", 1800),
    r("998713", "Maintenance and repair services of computers and peripheral equipment", 1800),
    r("999293", "Commercial training and coaching services", 1800),
];
