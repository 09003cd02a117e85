//! Static reference tables used by the extraction heuristics.
//!
//! * [`UN_MEMBER_STATES`]: the 193 UN member states with their English
//!   demonyms, ordered by common name. Nationality lookup takes the first
//!   entry whose demonym occurs in the text, so order is significant.
//! * [`INTERNATIONAL_ORGANISATIONS`]: organisations a secretary-general may
//!   have headed, most specific names first ("United Nations Development
//!   Programme" must win over "United Nations").

/// A UN member state and its English demonyms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub name: &'static str,
    pub demonym_f: &'static str,
    pub demonym_m: &'static str,
}

const fn same(name: &'static str, demonym: &'static str) -> Country {
    Country {
        name,
        demonym_f: demonym,
        demonym_m: demonym,
    }
}

pub const UN_MEMBER_STATES: &[Country] = &[
    same("Afghanistan", "Afghan"),
    same("Albania", "Albanian"),
    same("Algeria", "Algerian"),
    same("Andorra", "Andorran"),
    same("Angola", "Angolan"),
    same("Antigua and Barbuda", "Antiguan"),
    same("Argentina", "Argentine"),
    same("Armenia", "Armenian"),
    same("Australia", "Australian"),
    same("Austria", "Austrian"),
    same("Azerbaijan", "Azerbaijani"),
    same("Bahamas", "Bahamian"),
    same("Bahrain", "Bahraini"),
    same("Bangladesh", "Bangladeshi"),
    same("Barbados", "Barbadian"),
    same("Belarus", "Belarusian"),
    same("Belgium", "Belgian"),
    same("Belize", "Belizean"),
    same("Benin", "Beninese"),
    same("Bhutan", "Bhutanese"),
    same("Bolivia", "Bolivian"),
    same("Bosnia and Herzegovina", "Bosnian"),
    same("Botswana", "Motswana"),
    same("Brazil", "Brazilian"),
    same("Brunei", "Bruneian"),
    same("Bulgaria", "Bulgarian"),
    same("Burkina Faso", "Burkinabe"),
    same("Burundi", "Burundian"),
    same("Cambodia", "Cambodian"),
    same("Cameroon", "Cameroonian"),
    same("Canada", "Canadian"),
    same("Cape Verde", "Cape Verdian"),
    same("Central African Republic", "Central African"),
    same("Chad", "Chadian"),
    same("Chile", "Chilean"),
    same("China", "Chinese"),
    same("Colombia", "Colombian"),
    same("Comoros", "Comoran"),
    same("Congo", "Congolese"),
    same("Costa Rica", "Costa Rican"),
    same("Croatia", "Croatian"),
    same("Cuba", "Cuban"),
    same("Cyprus", "Cypriot"),
    same("Czechia", "Czech"),
    same("DR Congo", "Congolese"),
    same("Denmark", "Danish"),
    same("Djibouti", "Djibouti"),
    same("Dominica", "Dominican"),
    same("Dominican Republic", "Dominican"),
    same("Ecuador", "Ecuadorean"),
    same("Egypt", "Egyptian"),
    same("El Salvador", "Salvadoran"),
    same("Equatorial Guinea", "Equatorial Guinean"),
    same("Eritrea", "Eritrean"),
    same("Estonia", "Estonian"),
    same("Eswatini", "Swazi"),
    same("Ethiopia", "Ethiopian"),
    same("Fiji", "Fijian"),
    same("Finland", "Finnish"),
    same("France", "French"),
    same("Gabon", "Gabonese"),
    same("Gambia", "Gambian"),
    same("Georgia", "Georgian"),
    same("Germany", "German"),
    same("Ghana", "Ghanaian"),
    same("Greece", "Greek"),
    same("Grenada", "Grenadian"),
    same("Guatemala", "Guatemalan"),
    same("Guinea", "Guinean"),
    same("Guinea-Bissau", "Guinea-Bissauan"),
    same("Guyana", "Guyanese"),
    same("Haiti", "Haitian"),
    same("Honduras", "Honduran"),
    same("Hungary", "Hungarian"),
    same("Iceland", "Icelander"),
    same("India", "Indian"),
    same("Indonesia", "Indonesian"),
    same("Iran", "Iranian"),
    same("Iraq", "Iraqi"),
    same("Ireland", "Irish"),
    same("Israel", "Israeli"),
    same("Italy", "Italian"),
    same("Ivory Coast", "Ivorian"),
    same("Jamaica", "Jamaican"),
    same("Japan", "Japanese"),
    same("Jordan", "Jordanian"),
    same("Kazakhstan", "Kazakhstani"),
    same("Kenya", "Kenyan"),
    same("Kiribati", "I-Kiribati"),
    same("Kuwait", "Kuwaiti"),
    same("Kyrgyzstan", "Kirghiz"),
    same("Laos", "Laotian"),
    same("Latvia", "Latvian"),
    same("Lebanon", "Lebanese"),
    same("Lesotho", "Mosotho"),
    same("Liberia", "Liberian"),
    same("Libya", "Libyan"),
    same("Liechtenstein", "Liechtensteiner"),
    same("Lithuania", "Lithuanian"),
    same("Luxembourg", "Luxembourger"),
    same("Madagascar", "Malagasy"),
    same("Malawi", "Malawian"),
    same("Malaysia", "Malaysian"),
    same("Maldives", "Maldivan"),
    same("Mali", "Malian"),
    same("Malta", "Maltese"),
    same("Marshall Islands", "Marshallese"),
    same("Mauritania", "Mauritanian"),
    same("Mauritius", "Mauritian"),
    same("Mexico", "Mexican"),
    same("Micronesia", "Micronesian"),
    same("Moldova", "Moldovan"),
    same("Monaco", "Monegasque"),
    same("Mongolia", "Mongolian"),
    same("Montenegro", "Montenegrin"),
    same("Morocco", "Moroccan"),
    same("Mozambique", "Mozambican"),
    same("Myanmar", "Bamar"),
    same("Namibia", "Namibian"),
    same("Nauru", "Nauruan"),
    same("Nepal", "Nepalese"),
    same("Netherlands", "Dutch"),
    same("New Zealand", "New Zealander"),
    same("Nicaragua", "Nicaraguan"),
    same("Niger", "Nigerien"),
    same("Nigeria", "Nigerian"),
    same("North Korea", "North Korean"),
    same("North Macedonia", "Macedonian"),
    same("Norway", "Norwegian"),
    same("Oman", "Omani"),
    same("Pakistan", "Pakistani"),
    same("Palau", "Palauan"),
    same("Panama", "Panamanian"),
    same("Papua New Guinea", "Papua New Guinean"),
    same("Paraguay", "Paraguayan"),
    same("Peru", "Peruvian"),
    Country {
        name: "Philippines",
        demonym_f: "Filipina",
        demonym_m: "Filipino",
    },
    same("Poland", "Polish"),
    same("Portugal", "Portuguese"),
    same("Qatar", "Qatari"),
    same("Romania", "Romanian"),
    same("Russia", "Russian"),
    same("Rwanda", "Rwandan"),
    same("Saint Kitts and Nevis", "Kittitian or Nevisian"),
    same("Saint Lucia", "Saint Lucian"),
    same("Saint Vincent and the Grenadines", "Saint Vincentian"),
    same("Samoa", "Samoan"),
    same("San Marino", "Sammarinese"),
    same("São Tomé and Príncipe", "Sao Tomean"),
    same("Saudi Arabia", "Saudi Arabian"),
    same("Senegal", "Senegalese"),
    same("Serbia", "Serbian"),
    same("Seychelles", "Seychellois"),
    same("Sierra Leone", "Sierra Leonean"),
    same("Singapore", "Singaporean"),
    same("Slovakia", "Slovak"),
    same("Slovenia", "Slovene"),
    same("Solomon Islands", "Solomon Islander"),
    same("Somalia", "Somali"),
    same("South Africa", "South African"),
    same("South Korea", "South Korean"),
    same("South Sudan", "South Sudanese"),
    same("Spain", "Spanish"),
    same("Sri Lanka", "Sri Lankan"),
    same("Sudan", "Sudanese"),
    same("Suriname", "Surinamer"),
    same("Sweden", "Swedish"),
    same("Switzerland", "Swiss"),
    same("Syria", "Syrian"),
    same("Tajikistan", "Tadzhik"),
    same("Tanzania", "Tanzanian"),
    same("Thailand", "Thai"),
    same("Timor-Leste", "East Timorese"),
    same("Togo", "Togolese"),
    same("Tonga", "Tongan"),
    same("Trinidad and Tobago", "Trinidadian"),
    same("Tunisia", "Tunisian"),
    same("Turkey", "Turkish"),
    same("Turkmenistan", "Turkmen"),
    same("Tuvalu", "Tuvaluan"),
    same("Uganda", "Ugandan"),
    same("Ukraine", "Ukrainian"),
    same("United Arab Emirates", "Emirati"),
    same("United Kingdom", "British"),
    same("United States", "American"),
    same("Uruguay", "Uruguayan"),
    same("Uzbekistan", "Uzbekistani"),
    same("Vanuatu", "Ni-Vanuatu"),
    same("Venezuela", "Venezuelan"),
    same("Vietnam", "Vietnamese"),
    same("Yemen", "Yemeni"),
    same("Zambia", "Zambian"),
    same("Zimbabwe", "Zimbabwean"),
];

/// An international organisation and its usual abbreviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Organisation {
    pub name: &'static str,
    pub abbreviation: Option<&'static str>,
}

impl Organisation {
    /// The abbreviation when there is one, otherwise the full name.
    pub fn label(&self) -> &'static str {
        self.abbreviation.unwrap_or(self.name)
    }
}

const fn org(name: &'static str, abbreviation: &'static str) -> Organisation {
    Organisation {
        name,
        abbreviation: Some(abbreviation),
    }
}

const fn unabbreviated(name: &'static str) -> Organisation {
    Organisation {
        name,
        abbreviation: None,
    }
}

pub const INTERNATIONAL_ORGANISATIONS: &[Organisation] = &[
    org(
        "United Nations Educational, Scientific and Cultural Organization",
        "UNESCO",
    ),
    org("United Nations Industrial Development Organization", "UNIDO"),
    org("United Nations Conference on Trade and Development", "UNCTAD"),
    org("United Nations Relief and Works Agency", "UNRWA"),
    org("United Nations High Commissioner for Refugees", "UNHCR"),
    org("United Nations Development Programme", "UNDP"),
    org("United Nations Environment Programme", "UNEP"),
    org("United Nations Children's Fund", "UNICEF"),
    org("Organisation for Economic Co-operation and Development", "OECD"),
    org("Organization for Security and Co-operation in Europe", "OSCE"),
    org("International Criminal Police Organization", "INTERPOL"),
    org("International Fund for Agricultural Development", "IFAD"),
    org("International Committee of the Red Cross", "ICRC"),
    org("International Civil Aviation Organization", "ICAO"),
    org("International Telecommunication Union", "ITU"),
    org("International Atomic Energy Agency", "IAEA"),
    org("International Maritime Organization", "IMO"),
    org("International Institute of Agriculture", "IIA"),
    org("International Labour Organization", "ILO"),
    org("International Labour Office", "ILO"),
    org("International Monetary Fund", "IMF"),
    org("World Intellectual Property Organization", "WIPO"),
    org("World Meteorological Organization", "WMO"),
    org("World Health Organization", "WHO"),
    org("World Trade Organization", "WTO"),
    org("Food and Agriculture Organization", "FAO"),
    org("General Agreement on Tariffs and Trade", "GATT"),
    org("Association of Southeast Asian Nations", "ASEAN"),
    org("North Atlantic Treaty Organization", "NATO"),
    org("Organization of American States", "OAS"),
    org("Organisation of African Unity", "OAU"),
    org("Organisation of Islamic Cooperation", "OIC"),
    org("European Free Trade Association", "EFTA"),
    org("Bank for International Settlements", "BIS"),
    org("Universal Postal Union", "UPU"),
    org("African Union", "AU"),
    unabbreviated("League of Arab States"),
    unabbreviated("Council of Europe"),
    unabbreviated("Nordic Council"),
    unabbreviated("World Bank"),
    unabbreviated("League of Nations"),
    org("United Nations", "UN"),
];
